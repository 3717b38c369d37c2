//! Infrastructure layer for configuration, HTTP transport, and persistence
//!
//! This module provides the environment/endpoint configuration, the shared
//! HTTP client over the three backends, the persisted session slot, the
//! persisted resources envelope, and logging bootstrap.

pub mod config;
pub mod gateways;
pub mod http_client;
pub mod logging;
pub mod resource_cache;
pub mod session_store;

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, Environment};
pub use http_client::{ApiBase, ApiClient, ApiError};
pub use resource_cache::ResourceCacheStore;
pub use session_store::SessionHandle;
