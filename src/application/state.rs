//! Application state management for Tauri
//!
//! [`AppState`] is the explicit process-wide context of the console: the
//! session slot, the filter state machine, the search orchestrator, the
//! note edit registry, and the resource cache all live here and are
//! injected into commands through Tauri's managed state instead of ambient
//! globals. Initialized on boot (restore persisted session + settings),
//! torn down piecewise by logout / cache invalidation.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::application::events::EventEmitter;
use crate::application::filter_state::{FilterStateMachine, SearchDebouncer};
use crate::application::note_editing::NoteEditRegistry;
use crate::application::product_search::SearchOrchestrator;
use crate::application::query_cache::SingleFlightCache;
use crate::domain::constants::cache::RESOURCES_TTL_HOURS;
use crate::domain::resources::ResourcesData;
use crate::infrastructure::config::{AppConfig, ConfigManager};
use crate::infrastructure::http_client::{ApiClient, ApiError};
use crate::infrastructure::resource_cache::ResourceCacheStore;
use crate::infrastructure::session_store::SessionHandle;
use crate::infrastructure::gateways;

/// Global application state managed by Tauri
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (environment profile + logging)
    pub config: Arc<RwLock<AppConfig>>,

    /// Event emitter for real-time communication with frontend
    pub event_emitter: Arc<RwLock<Option<EventEmitter>>>,

    /// Persisted auth session slot (single writer: login/logout/401)
    pub session: SessionHandle,

    /// Filter state machine: applied set + pending drafts + search input
    pub filters: Arc<RwLock<FilterStateMachine>>,

    /// Quiet-period timer for the search input
    pub debouncer: Arc<SearchDebouncer>,

    /// Product search orchestration over the single-flight cache
    pub search: Arc<SearchOrchestrator>,

    /// Per-note local edit states
    pub notes: Arc<RwLock<NoteEditRegistry>>,

    /// Persisted taxonomy envelope (24h TTL)
    pub resource_store: ResourceCacheStore,

    /// In-memory single-flight layer over the resources fetch
    pub resources: Arc<SingleFlightCache<ResourcesData, ApiError>>,

    /// Shared HTTP client over the three backends
    pub api: ApiClient,
}

impl AppState {
    /// Build the state rooted at the platform data dir
    pub fn new(config: AppConfig) -> Result<Self> {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sixgo-cs-console");
        Self::with_data_dir(config, data_dir)
    }

    /// Build the state rooted at an explicit data dir (used by tests)
    pub fn with_data_dir(config: AppConfig, data_dir: PathBuf) -> Result<Self> {
        let config = Arc::new(RwLock::new(config));
        let session = SessionHandle::new(data_dir.clone());
        let api = ApiClient::new(Arc::clone(&config), session.clone())?;

        Ok(Self {
            config,
            event_emitter: Arc::new(RwLock::new(None)),
            session,
            filters: Arc::new(RwLock::new(FilterStateMachine::new())),
            debouncer: Arc::new(SearchDebouncer::new()),
            search: Arc::new(SearchOrchestrator::new()),
            notes: Arc::new(RwLock::new(NoteEditRegistry::new())),
            resource_store: ResourceCacheStore::new(data_dir),
            resources: Arc::new(SingleFlightCache::new(Duration::from_secs(
                RESOURCES_TTL_HOURS * 3600,
            ))),
            api,
        })
    }

    /// Boot-time initialization: install the event emitter, wire the 401
    /// hook, load the settings file, restore the persisted session.
    pub async fn initialize(&self, emitter: EventEmitter) {
        *self.event_emitter.write().await = Some(emitter);

        let emitter_slot = Arc::clone(&self.event_emitter);
        self.api
            .set_unauthorized_hook(Arc::new(move || {
                let emitter_slot = Arc::clone(&emitter_slot);
                tokio::spawn(async move {
                    if let Some(emitter) = emitter_slot.read().await.clone() {
                        emitter.emit_session_expired().await;
                    }
                });
            }))
            .await;

        let loaded = ConfigManager::from_default_location().load().await;
        *self.config.write().await = loaded;

        self.session.load_persisted().await;
        info!("Application state initialized");
    }

    /// Get the event emitter
    pub async fn emitter(&self) -> Option<EventEmitter> {
        self.event_emitter.read().await.clone()
    }

    /// Resources with the layered caching discipline: in-memory single
    /// flight first, then the persisted envelope, then the network.
    ///
    /// `force_refresh` drops both cache layers before fetching; concurrent
    /// callers during a fetch are coalesced into the one in-flight request.
    pub async fn load_resources(&self, force_refresh: bool) -> Result<ResourcesData, ApiError> {
        if force_refresh {
            self.resource_store.invalidate().await;
            self.resources.invalidate_all().await;
        }

        let store = self.resource_store.clone();
        let api = self.api.clone();
        self.resources
            .get_or_fetch("resources", || async move {
                if let Some(cached) = store.load_fresh().await {
                    return Ok(cached);
                }
                let data = gateways::fetch_resources(&api).await?;
                if let Err(e) = store.store(&data).await {
                    // a failed write only costs us a refetch next session
                    warn!("Failed to persist resources envelope: {}", e);
                }
                Ok(data)
            })
            .await
    }
}
