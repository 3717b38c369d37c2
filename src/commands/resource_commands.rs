//! Resource taxonomy commands for Tauri IPC
//!
//! Serve the dropdown option lists derived from the cached resources
//! payload. The heavy lifting (TTL envelope, single-flight fetch) lives in
//! [`AppState::load_resources`]; these commands only derive projections.

use serde::{Deserialize, Serialize};
use tauri::State;
use tracing::{error, info};
use ts_rs::TS;

use crate::application::state::AppState;
use crate::domain::resources::{
    self, FlatCategory, FlatLocation, Language, ProcessMethod, ProductType,
};

/// Option lists independent of the main category selection
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOptions {
    pub main_categories: Vec<FlatCategory>,
    pub flat_categories: Vec<FlatCategory>,
    pub languages: Vec<Language>,
    /// Whole location tree, path-joined, for admin views
    pub flat_locations: Vec<FlatLocation>,
    /// Vietnam cities + districts, the location filter's option list
    pub vn_locations: Vec<FlatLocation>,
}

fn options_from(data: &resources::ResourcesData) -> ResourceOptions {
    ResourceOptions {
        main_categories: resources::extract_main_categories(&data.categories),
        flat_categories: resources::flatten_categories(&data.categories),
        languages: data.languages.clone(),
        flat_locations: resources::flatten_locations(&data.locations),
        vn_locations: resources::extract_vietnam_locations(&data.locations),
    }
}

/// Dropdown options, served from cache within the TTL window
#[tauri::command]
pub async fn get_resource_options(state: State<'_, AppState>) -> Result<ResourceOptions, String> {
    match state.load_resources(false).await {
        Ok(data) => Ok(options_from(&data)),
        Err(e) => {
            error!("Failed to load resources: {}", e.message);
            Err(e.message)
        }
    }
}

/// Force refresh: drop the persisted envelope and the in-memory entry,
/// refetch, and tell the frontend to re-derive its dropdowns
#[tauri::command]
pub async fn refresh_resources(state: State<'_, AppState>) -> Result<ResourceOptions, String> {
    match state.load_resources(true).await {
        Ok(data) => {
            info!("✅ Resources refreshed ({} categories)", data.categories.len());
            if let Some(emitter) = state.emitter().await {
                emitter.emit_resources_refreshed().await;
            }
            Ok(options_from(&data))
        }
        Err(e) => {
            error!("Failed to refresh resources: {}", e.message);
            Err(e.message)
        }
    }
}

/// Subcategories of one main category (dependent dropdown)
#[tauri::command]
pub async fn get_sub_categories(
    state: State<'_, AppState>,
    main_category_code: String,
) -> Result<Vec<FlatCategory>, String> {
    let data = state.load_resources(false).await.map_err(|e| e.message)?;
    Ok(resources::extract_sub_categories(
        &data.categories,
        &main_category_code,
    ))
}

/// Product types keyed by main category (dependent dropdown)
#[tauri::command]
pub async fn get_product_types(
    state: State<'_, AppState>,
    main_category_code: String,
) -> Result<Vec<ProductType>, String> {
    let data = state.load_resources(false).await.map_err(|e| e.message)?;
    Ok(data.product_types_for(&main_category_code))
}

/// Process methods keyed by main category (dependent dropdown)
#[tauri::command]
pub async fn get_process_methods(
    state: State<'_, AppState>,
    main_category_code: String,
) -> Result<Vec<ProcessMethod>, String> {
    let data = state.load_resources(false).await.map_err(|e| e.message)?;
    Ok(data.process_methods_for(&main_category_code))
}
