//! Configuration commands for Tauri IPC
//!
//! The frontend always reads configuration from the backend through these
//! commands so there is a single source of truth for environment and
//! endpoint resolution.

use serde::{Deserialize, Serialize};
use tauri::State;
use ts_rs::TS;

use crate::application::state::AppState;

/// Frontend-friendly configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FrontendConfig {
    /// Display name of the active environment (header badge)
    pub environment_name: String,
    pub resource_api_url: String,
    pub admin_api_url: String,
    pub identity_api_url: String,
    pub origin_url: String,
}

/// Resolved configuration for the active environment
#[tauri::command]
pub async fn get_frontend_config(state: State<'_, AppState>) -> Result<FrontendConfig, String> {
    let config = state.config.read().await;
    let endpoints = config.endpoints();

    Ok(FrontendConfig {
        environment_name: config.environment.display_name().to_owned(),
        resource_api_url: endpoints.resource_api_url,
        admin_api_url: endpoints.admin_api_url,
        identity_api_url: endpoints.identity_api_url,
        origin_url: endpoints.origin_url,
    })
}
