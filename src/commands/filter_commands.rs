//! Filter state commands for Tauri IPC
//!
//! Every applied-state transition goes through the state machine, runs the
//! pending sync pass with the transition's origin tag, and pushes the new
//! canonical snapshot to the frontend via `filters-changed`. The search
//! input is the only debounced path: keystrokes return immediately and the
//! commit fires after the quiet period, guarded by the keystroke epoch.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tauri::State;
use tracing::debug;
use ts_rs::TS;

use crate::application::filter_state::{FilterField, FilterSnapshot, FilterValues};
use crate::application::state::AppState;
use crate::domain::constants::filters::{
    DEFAULT_PAGE_SIZE, NUMBER_OF_PROGRESSES_OPTIONS, PAGE_SIZE_OPTIONS, SEARCH_DEBOUNCE_MS,
    SESSIONS_PER_WEEK_OPTIONS,
};

/// Build-time fixed option domains for the numeric filter controls
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptionDomains {
    pub number_of_progresses: Vec<u32>,
    pub sessions_per_week: Vec<u32>,
    pub page_sizes: Vec<u32>,
    pub default_page_size: u32,
    pub search_debounce_ms: u64,
}

async fn emit_filters_changed(state: &AppState) {
    let applied = state.filters.read().await.applied().clone();
    if let Some(emitter) = state.emitter().await {
        emitter.emit_filters_changed(applied).await;
    }
}

/// Fixed option domains for the numeric multi-selects and pagination
#[tauri::command]
pub async fn get_filter_option_domains() -> Result<FilterOptionDomains, String> {
    Ok(FilterOptionDomains {
        number_of_progresses: NUMBER_OF_PROGRESSES_OPTIONS.clone(),
        sessions_per_week: SESSIONS_PER_WEEK_OPTIONS.to_vec(),
        page_sizes: PAGE_SIZE_OPTIONS.to_vec(),
        default_page_size: DEFAULT_PAGE_SIZE,
        search_debounce_ms: SEARCH_DEBOUNCE_MS,
    })
}

/// Current applied + pending + search-input snapshot
#[tauri::command]
pub async fn get_filter_snapshot(state: State<'_, AppState>) -> Result<FilterSnapshot, String> {
    Ok(state.filters.read().await.snapshot())
}

/// Select the main category; dependent filters are cleared on both sides
#[tauri::command]
pub async fn set_main_category(
    state: State<'_, AppState>,
    code: String,
) -> Result<FilterSnapshot, String> {
    let snapshot = {
        let mut filters = state.filters.write().await;
        let origin = filters.set_main_category(code);
        filters.sync_pending(origin);
        filters.snapshot()
    };
    emit_filters_changed(&state).await;
    Ok(snapshot)
}

/// Stage draft values for one multi-select; applied state is untouched
#[tauri::command]
pub async fn set_pending_values(
    state: State<'_, AppState>,
    field: FilterField,
    values: FilterValues,
) -> Result<FilterSnapshot, String> {
    let mut filters = state.filters.write().await;
    filters.set_pending(field, values);
    Ok(filters.snapshot())
}

/// Commit the pending draft of one field (empty draft becomes unset)
#[tauri::command]
pub async fn apply_filter_field(
    state: State<'_, AppState>,
    field: FilterField,
) -> Result<FilterSnapshot, String> {
    let snapshot = {
        let mut filters = state.filters.write().await;
        let origin = filters.apply_field(field);
        filters.sync_pending(origin);
        filters.snapshot()
    };
    emit_filters_changed(&state).await;
    Ok(snapshot)
}

/// Empty one field's draft and unset its applied value
#[tauri::command]
pub async fn clear_filter_field(
    state: State<'_, AppState>,
    field: FilterField,
) -> Result<FilterSnapshot, String> {
    let snapshot = {
        let mut filters = state.filters.write().await;
        let origin = filters.clear_field(field);
        filters.sync_pending(origin);
        filters.snapshot()
    };
    emit_filters_changed(&state).await;
    Ok(snapshot)
}

/// Collapse applied filters to defaults, keeping the main category
#[tauri::command]
pub async fn reset_filters(state: State<'_, AppState>) -> Result<FilterSnapshot, String> {
    let snapshot = {
        let mut filters = state.filters.write().await;
        let origin = filters.reset_filters();
        filters.sync_pending(origin);
        filters.snapshot()
    };
    emit_filters_changed(&state).await;
    Ok(snapshot)
}

/// Drop everything: filters, main category, search input, pending debounce
#[tauri::command]
pub async fn clear_all_filters(state: State<'_, AppState>) -> Result<FilterSnapshot, String> {
    state.debouncer.cancel().await;
    let snapshot = {
        let mut filters = state.filters.write().await;
        let origin = filters.clear_all();
        filters.sync_pending(origin);
        filters.snapshot()
    };
    emit_filters_changed(&state).await;
    Ok(snapshot)
}

/// Record a search keystroke and (re)start the quiet-period countdown.
/// The commit lands only if no further keystroke supersedes it.
#[tauri::command]
pub async fn set_search_input(state: State<'_, AppState>, input: String) -> Result<(), String> {
    let epoch = state.filters.write().await.set_search_input(input);
    debug!("Search input changed (epoch {})", epoch);

    let app_state = state.inner().clone();
    state
        .debouncer
        .schedule(Duration::from_millis(SEARCH_DEBOUNCE_MS), async move {
            let committed = app_state.filters.write().await.commit_search(epoch);
            if committed {
                let applied = app_state.filters.read().await.applied().clone();
                if let Some(emitter) = app_state.emitter().await {
                    emitter.emit_search_committed(applied.search_term.clone()).await;
                    emitter.emit_filters_changed(applied).await;
                }
            }
        })
        .await;

    Ok(())
}
