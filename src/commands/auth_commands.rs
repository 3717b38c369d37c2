//! Authentication commands for Tauri IPC
//!
//! Login/logout against the identity backend plus the auth snapshot the
//! frontend uses for route guarding. Local sign-out always succeeds even
//! when the logout round trip fails.

use tauri::State;
use tracing::{error, info, warn};

use crate::application::state::AppState;
use crate::domain::auth::{AuthStatus, LoginRequest};
use crate::domain::events::NoticeLevel;
use crate::infrastructure::gateways;

/// Sign in and persist the returned session
#[tauri::command]
pub async fn login(
    state: State<'_, AppState>,
    email: String,
    password: String,
    remember_me: bool,
) -> Result<AuthStatus, String> {
    let request = LoginRequest {
        email,
        password,
        remember_me,
    };

    match gateways::sign_in(&state.api, &request).await {
        Ok(data) => {
            let user_name = data.user_name.clone();
            state
                .session
                .establish(data.into())
                .await
                .map_err(|e| format!("Failed to persist session: {e}"))?;

            info!("✅ Signed in as {}", user_name);
            if let Some(emitter) = state.emitter().await {
                emitter
                    .emit_notice(NoticeLevel::Success, "Login successful!")
                    .await;
            }
            Ok(AuthStatus::from_session(state.session.snapshot().await.as_ref()))
        }
        Err(e) => {
            error!("Login failed: {}", e.message);
            if let Some(emitter) = state.emitter().await {
                emitter.emit_notice(NoticeLevel::Error, e.message.clone()).await;
            }
            Err(e.message)
        }
    }
}

/// Sign out. The server call is best-effort; the local slot is always cleared.
#[tauri::command]
pub async fn logout(state: State<'_, AppState>) -> Result<AuthStatus, String> {
    let server_logout = gateways::sign_out(&state.api).await;
    state.session.clear().await;

    match server_logout {
        Ok(_) => {
            info!("✅ Signed out");
            if let Some(emitter) = state.emitter().await {
                emitter
                    .emit_notice(NoticeLevel::Success, "Logged out successfully")
                    .await;
            }
        }
        Err(e) => {
            warn!("Server logout failed ({}), signed out locally", e.message);
            if let Some(emitter) = state.emitter().await {
                emitter.emit_notice(NoticeLevel::Info, "Logged out locally").await;
            }
        }
    }

    Ok(AuthStatus::default())
}

/// Snapshot of the current session for route guarding
#[tauri::command]
pub async fn auth_status(state: State<'_, AppState>) -> Result<AuthStatus, String> {
    Ok(AuthStatus::from_session(state.session.snapshot().await.as_ref()))
}
