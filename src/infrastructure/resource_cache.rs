//! Persisted resources envelope with 24h TTL
//!
//! The category/location taxonomy is large and changes rarely, so the full
//! `GET /resources` payload is kept on disk wrapped with its fetch time.
//! Within the TTL the envelope is served without network access; a corrupt
//! or expired envelope reads as a cache miss, never an error. Invalidation
//! only removes the file - the caller decides when to refetch.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::domain::constants::cache::RESOURCES_TTL_HOURS;
use crate::domain::resources::ResourcesData;

const RESOURCES_CACHE_FILE: &str = "6ixgo_resources.json";

/// On-disk envelope: payload plus fetch timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResources {
    data: ResourcesData,
    timestamp: DateTime<Utc>,
}

impl CachedResources {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.timestamp) > Duration::hours(RESOURCES_TTL_HOURS as i64)
    }
}

/// Store for the persisted taxonomy envelope
#[derive(Debug, Clone)]
pub struct ResourceCacheStore {
    cache_path: PathBuf,
}

impl ResourceCacheStore {
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            cache_path: data_dir.join(RESOURCES_CACHE_FILE),
        }
    }

    /// Return the cached payload if a structurally valid, non-expired
    /// envelope exists. Anything else is a miss.
    pub async fn load_fresh(&self) -> Option<ResourcesData> {
        let raw = fs::read_to_string(&self.cache_path).await.ok()?;
        let envelope: CachedResources = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Resources cache is not parsable ({}), treating as miss", e);
                return None;
            }
        };

        if envelope.is_expired(Utc::now()) {
            debug!("Resources cache expired (fetched {})", envelope.timestamp);
            return None;
        }
        Some(envelope.data)
    }

    /// Persist a freshly fetched payload with the current timestamp
    pub async fn store(&self, data: &ResourcesData) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create data dir {}", parent.display()))?;
        }
        let envelope = CachedResources {
            data: data.clone(),
            timestamp: Utc::now(),
        };
        let serialized =
            serde_json::to_string(&envelope).context("Failed to serialize resources cache")?;
        fs::write(&self.cache_path, serialized)
            .await
            .with_context(|| format!("Failed to write {}", self.cache_path.display()))?;
        info!("Stored resources envelope ({} categories)", data.categories.len());
        Ok(())
    }

    /// Remove the persisted envelope. Does not trigger any refetch.
    pub async fn invalidate(&self) {
        if let Err(e) = fs::remove_file(&self.cache_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove resources cache: {}", e);
            }
        }
    }
}
