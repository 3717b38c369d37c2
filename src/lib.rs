//! 6ixgo CS Console - Customer Support Admin Desktop Application
//!
//! This application lets support staff search the product catalog by
//! category and filters, page through results, and attach CS notes to
//! products and variants, with a desktop interface built with Tauri.

// Module declarations
pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;

// Re-export commands for easier access
pub use commands::*;

use application::{AppState, EventEmitter};
use infrastructure::config::AppConfig;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let config = AppConfig::default();
    if let Err(e) = infrastructure::logging::init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let state = AppState::new(config).expect("failed to build application state");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(state)
        .setup(|app| {
            let state = app.state::<AppState>().inner().clone();
            let emitter = EventEmitter::new(app.handle().clone());
            tauri::async_runtime::spawn(async move {
                state.initialize(emitter).await;
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // auth
            login,
            logout,
            auth_status,
            // config
            get_frontend_config,
            // resources
            get_resource_options,
            refresh_resources,
            get_sub_categories,
            get_product_types,
            get_process_methods,
            // filters
            get_filter_option_domains,
            get_filter_snapshot,
            set_main_category,
            set_pending_values,
            apply_filter_field,
            clear_filter_field,
            reset_filters,
            clear_all_filters,
            set_search_input,
            // products & notes
            search_products,
            set_page,
            set_page_size,
            get_note_state,
            begin_note_edit,
            update_note_drafts,
            cancel_note_edit,
            save_note,
            delete_note,
            open_product_link
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
