//! Tauri IPC command surface
//!
//! Commands are grouped per concern; all of them return `Result<T, String>`
//! toward the webview, with the user-facing message already shaped by the
//! error normalization in the HTTP layer.

pub mod auth_commands;
pub mod config_commands;
pub mod filter_commands;
pub mod product_commands;
pub mod resource_commands;

// Re-export all commands
pub use auth_commands::*;
pub use config_commands::*;
pub use filter_commands::*;
pub use product_commands::*;
pub use resource_commands::*;
