//! Event emission system for real-time communication with frontend
//!
//! Centralized emitter pushing [`ConsoleEvent`]s over the Tauri event
//! channel so the webview can follow backend state transitions (filter
//! changes, debounce commits, forced logout) without polling.

use std::sync::Arc;
use tauri::{AppHandle, Emitter};
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::domain::events::{ConsoleEvent, NoticeLevel};
use crate::domain::product::ProductFilterParams;

/// Event emitter for sending real-time updates to the frontend
#[derive(Clone)]
pub struct EventEmitter {
    app_handle: AppHandle,
    /// Whether event emission is enabled
    enabled: Arc<RwLock<bool>>,
}

impl EventEmitter {
    /// Create a new event emitter
    #[must_use]
    pub fn new(app_handle: AppHandle) -> Self {
        Self {
            app_handle,
            enabled: Arc::new(RwLock::new(true)),
        }
    }

    /// Enable or disable event emission
    pub async fn set_enabled(&self, enabled: bool) {
        *self.enabled.write().await = enabled;
        debug!("Event emission {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Emit a console event to the frontend
    pub async fn emit_event(&self, event: ConsoleEvent) {
        if !*self.enabled.read().await {
            return;
        }

        let event_name = event.event_name();
        match self.app_handle.emit(event_name, &event) {
            Ok(()) => debug!("Emitted event: {}", event_name),
            Err(e) => error!("Failed to emit event {}: {}", event_name, e),
        }
    }

    /// Emit the canonical applied-filter snapshot after a transition
    pub async fn emit_filters_changed(&self, applied: ProductFilterParams) {
        self.emit_event(ConsoleEvent::FiltersChanged(applied)).await;
    }

    /// Emit the committed search term after the debounce settles
    pub async fn emit_search_committed(&self, term: Option<String>) {
        self.emit_event(ConsoleEvent::SearchTermCommitted { term }).await;
    }

    /// Emit the forced-logout signal after a 401
    pub async fn emit_session_expired(&self) {
        self.emit_event(ConsoleEvent::SessionExpired).await;
    }

    /// Emit the resources-refreshed signal after a forced refresh
    pub async fn emit_resources_refreshed(&self) {
        self.emit_event(ConsoleEvent::ResourcesRefreshed).await;
    }

    /// Emit a lightweight inline notice
    pub async fn emit_notice(&self, level: NoticeLevel, message: impl Into<String>) {
        self.emit_event(ConsoleEvent::Notice {
            level,
            message: message.into(),
        })
        .await;
    }
}
