//! Event types for real-time communication between backend and frontend
//!
//! Everything the Rust side pushes to the webview (as opposed to answering
//! an IPC call) is one of these events. The filter state machine emits
//! `FiltersChanged` after every applied-state transition so the view always
//! renders from the backend's canonical state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::domain::product::ProductFilterParams;

/// Severity of a lightweight inline notice shown by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Events emitted to the frontend over the Tauri event channel
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum ConsoleEvent {
    /// The applied filter set changed (any origin); payload is the full
    /// canonical snapshot
    FiltersChanged(ProductFilterParams),
    /// The debounced search input settled and was committed
    SearchTermCommitted { term: Option<String> },
    /// A 401 was observed; the session slot has been cleared and the
    /// frontend must navigate to the login entry point (unless already there)
    SessionExpired,
    /// The resources envelope was force-refreshed; dropdowns should re-derive
    ResourcesRefreshed,
    /// Client-side notice, never sent to the network
    Notice { level: NoticeLevel, message: String },
}

impl ConsoleEvent {
    /// Tauri event channel name for this event
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::FiltersChanged(_) => "filters-changed",
            Self::SearchTermCommitted { .. } => "search-term-committed",
            Self::SessionExpired => "session-expired",
            Self::ResourcesRefreshed => "resources-refreshed",
            Self::Notice { .. } => "notice",
        }
    }
}
