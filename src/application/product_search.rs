//! Product search orchestration
//!
//! Issues the search keyed by the full serialized filter set through the
//! single-flight cache, tracks the currently active key so stale in-flight
//! responses for abandoned filter sets are ignored rather than applied,
//! and keeps the previous result set on screen when a search fails.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use ts_rs::TS;

use crate::application::query_cache::SingleFlightCache;
use crate::domain::constants::cache::SEARCH_FRESHNESS_MINUTES;
use crate::domain::product::{PaginatedData, Product, ProductFilterParams};
use crate::infrastructure::http_client::ApiError;

/// Everything the results table needs to render
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SearchViewState {
    /// False until a main category is selected; no request is made then
    pub is_enabled: bool,
    pub items: Vec<Product>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_records: u64,
    pub total_pages: u32,
    /// User-facing message of the most recent failure, if the latest
    /// search for the active filter set failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Orchestrates product searches over the single-flight cache
pub struct SearchOrchestrator {
    cache: SingleFlightCache<PaginatedData<Product>, ApiError>,
    /// Cache key of the filter set the view currently renders; responses
    /// for any other key are dropped on arrival
    active_key: RwLock<Option<String>>,
    last_result: RwLock<Option<PaginatedData<Product>>>,
    last_error: RwLock<Option<String>>,
}

impl Default for SearchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOrchestrator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: SingleFlightCache::new(Duration::from_secs(SEARCH_FRESHNESS_MINUTES * 60)),
            active_key: RwLock::new(None),
            last_result: RwLock::new(None),
            last_error: RwLock::new(None),
        }
    }

    /// Run (or serve from cache) the search for `filters`.
    ///
    /// Disabled until a main category is selected. On failure the previous
    /// items stay untouched and only the error message changes.
    pub async fn search<F, Fut>(&self, filters: &ProductFilterParams, fetch: F) -> SearchViewState
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PaginatedData<Product>, ApiError>>,
    {
        if !filters.is_searchable() {
            *self.active_key.write().await = None;
            return self.view_state(filters).await;
        }

        let key = filters.cache_key();
        *self.active_key.write().await = Some(key.clone());

        match self.cache.get_or_fetch(&key, fetch).await {
            Ok(page) => {
                if self.is_active(&key).await {
                    *self.last_result.write().await = Some(page);
                    *self.last_error.write().await = None;
                }
            }
            Err(error) => {
                if self.is_active(&key).await {
                    *self.last_error.write().await = Some(error.message);
                }
            }
        }

        self.view_state(filters).await
    }

    async fn is_active(&self, key: &str) -> bool {
        self.active_key.read().await.as_deref() == Some(key)
    }

    /// Current view without issuing any request
    pub async fn view_state(&self, filters: &ProductFilterParams) -> SearchViewState {
        let last_result = self.last_result.read().await;
        let error_message = self.last_error.read().await.clone();

        match last_result.as_ref() {
            Some(page) => SearchViewState {
                is_enabled: filters.is_searchable(),
                items: page.items.clone(),
                page_number: page.page_number,
                page_size: page.page_size,
                total_records: page.total_records,
                total_pages: page.total_pages,
                error_message,
            },
            None => SearchViewState {
                is_enabled: filters.is_searchable(),
                items: Vec::new(),
                page_number: filters.page_number,
                page_size: filters.page_size,
                total_records: 0,
                total_pages: 0,
                error_message,
            },
        }
    }

    /// Total pages of the last successful search, for jump validation
    pub async fn known_total_pages(&self) -> Option<u32> {
        self.last_result.read().await.as_ref().map(|page| page.total_pages)
    }

    /// Drop every cached search result. Called exactly once per successful
    /// note mutation; the caller refetches the current page afterwards.
    pub async fn invalidate(&self) {
        self.cache.invalidate_all().await;
    }
}
