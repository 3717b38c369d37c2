//! Product search and CS note commands for Tauri IPC
//!
//! Search always runs against the current applied filter set through the
//! orchestrator (cache + single flight). Pagination commands validate
//! client-side before touching the network; note mutations invalidate the
//! search cache exactly once on success and refetch the current page so
//! the table reflects the edit immediately.

use tauri::State;
use tracing::{error, info};

use crate::application::note_editing::{NoteEditState, SaveOutcome};
use crate::application::product_search::SearchViewState;
use crate::application::state::AppState;
use crate::domain::constants::filters::PAGE_SIZE_OPTIONS;
use crate::domain::events::NoticeLevel;
use crate::infrastructure::gateways;

async fn notify(state: &AppState, level: NoticeLevel, message: impl Into<String>) {
    if let Some(emitter) = state.emitter().await {
        emitter.emit_notice(level, message).await;
    }
}

/// Run the search for the current applied filter set and re-seed the note
/// edit registry from the returned page
async fn run_search(state: &AppState) -> SearchViewState {
    let applied = state.filters.read().await.applied().clone();
    let api = state.api.clone();
    let request_filters = applied.clone();

    let view = state
        .search
        .search(&applied, move || async move {
            gateways::search_products(&api, &request_filters).await
        })
        .await;

    state.notes.write().await.seed_from_products(&view.items);
    view
}

/// Search with the current applied filter set (cache-aware)
#[tauri::command]
pub async fn search_products(state: State<'_, AppState>) -> Result<SearchViewState, String> {
    Ok(run_search(&state).await)
}

/// Jump to a page. Out-of-range jumps surface an inline notice and never
/// reach the network.
#[tauri::command]
pub async fn set_page(
    state: State<'_, AppState>,
    page_number: u32,
) -> Result<SearchViewState, String> {
    let known_total = state.search.known_total_pages().await;
    let out_of_range = page_number < 1
        || known_total.is_some_and(|total| total > 0 && page_number > total);

    if out_of_range {
        notify(
            &state,
            NoticeLevel::Warning,
            format!("Page {page_number} is out of range"),
        )
        .await;
        let applied = state.filters.read().await.applied().clone();
        return Ok(state.search.view_state(&applied).await);
    }

    state.filters.write().await.set_page(page_number);
    Ok(run_search(&state).await)
}

/// Change the page size (fixed option set) and jump back to page 1
#[tauri::command]
pub async fn set_page_size(
    state: State<'_, AppState>,
    page_size: u32,
) -> Result<SearchViewState, String> {
    if !PAGE_SIZE_OPTIONS.contains(&page_size) {
        notify(
            &state,
            NoticeLevel::Warning,
            format!("Page size {page_size} is not supported"),
        )
        .await;
        let applied = state.filters.read().await.applied().clone();
        return Ok(state.search.view_state(&applied).await);
    }

    state.filters.write().await.set_page_size(page_size);
    Ok(run_search(&state).await)
}

/// Edit state of one note pair (product-level when `variant_id` is absent)
#[tauri::command]
pub async fn get_note_state(
    state: State<'_, AppState>,
    product_id: String,
    variant_id: Option<String>,
) -> Result<NoteEditState, String> {
    Ok(state
        .notes
        .read()
        .await
        .state_for(&product_id, variant_id.as_deref()))
}

/// Enter edit mode for one note pair
#[tauri::command]
pub async fn begin_note_edit(
    state: State<'_, AppState>,
    product_id: String,
    variant_id: Option<String>,
) -> Result<NoteEditState, String> {
    let mut notes = state.notes.write().await;
    notes.begin_edit(&product_id, variant_id.as_deref());
    Ok(notes.state_for(&product_id, variant_id.as_deref()))
}

/// Update the local drafts while editing
#[tauri::command]
pub async fn update_note_drafts(
    state: State<'_, AppState>,
    product_id: String,
    variant_id: Option<String>,
    important: String,
    special: String,
) -> Result<NoteEditState, String> {
    let mut notes = state.notes.write().await;
    notes.update_drafts(&product_id, variant_id.as_deref(), important, special);
    Ok(notes.state_for(&product_id, variant_id.as_deref()))
}

/// Discard drafts and leave edit mode without submitting
#[tauri::command]
pub async fn cancel_note_edit(
    state: State<'_, AppState>,
    product_id: String,
    variant_id: Option<String>,
) -> Result<NoteEditState, String> {
    let mut notes = state.notes.write().await;
    notes.cancel(&product_id, variant_id.as_deref());
    Ok(notes.state_for(&product_id, variant_id.as_deref()))
}

/// Save one note pair. A clean editor is a client-side no-op with a notice;
/// a successful save invalidates the search cache once and refetches.
#[tauri::command]
pub async fn save_note(
    state: State<'_, AppState>,
    product_id: String,
    variant_id: Option<String>,
) -> Result<SearchViewState, String> {
    let outcome = state
        .notes
        .write()
        .await
        .save(&product_id, variant_id.as_deref());

    let request = match outcome {
        SaveOutcome::NoChanges => {
            notify(&state, NoticeLevel::Info, "No changes to save").await;
            let applied = state.filters.read().await.applied().clone();
            return Ok(state.search.view_state(&applied).await);
        }
        SaveOutcome::Submit(request) => request,
    };

    match gateways::update_note(&state.api, &request).await {
        Ok(_) => {
            state
                .notes
                .write()
                .await
                .mark_saved(&product_id, variant_id.as_deref());
            info!("✅ Saved CS note for ({}, {:?})", product_id, variant_id);
            notify(&state, NoticeLevel::Success, "Note saved successfully").await;

            state.search.invalidate().await;
            Ok(run_search(&state).await)
        }
        Err(e) => {
            error!("Failed to save note: {}", e.message);
            notify(&state, NoticeLevel::Error, e.message.clone()).await;
            Err(e.message)
        }
    }
}

/// Delete one note pair (both fields forced empty). Local drafts clear
/// immediately; success invalidates the search cache once and refetches.
#[tauri::command]
pub async fn delete_note(
    state: State<'_, AppState>,
    product_id: String,
    variant_id: Option<String>,
) -> Result<SearchViewState, String> {
    let request = state
        .notes
        .write()
        .await
        .delete(&product_id, variant_id.as_deref());

    match gateways::update_note(&state.api, &request).await {
        Ok(_) => {
            info!("✅ Deleted CS note for ({}, {:?})", product_id, variant_id);
            notify(&state, NoticeLevel::Success, "Note deleted successfully").await;

            state.search.invalidate().await;
            Ok(run_search(&state).await)
        }
        Err(e) => {
            error!("Failed to delete note: {}", e.message);
            notify(&state, NoticeLevel::Error, e.message.clone()).await;
            Err(e.message)
        }
    }
}

/// Open a product's B2C page in the system browser
#[tauri::command]
pub async fn open_product_link(app: tauri::AppHandle, url: String) -> Result<(), String> {
    use tauri_plugin_opener::OpenerExt;

    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| format!("Failed to open product page: {e}"))
}
