//! Persisted auth session slot
//!
//! One named slot on disk holds the serialized session; an in-memory copy
//! avoids re-reading it for every request's bearer header. Absence or a
//! failed structural parse of the slot means unauthenticated - never an
//! error. Mutation has a single writer path (login/logout plus the 401
//! handler), always driven from the UI event flow.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::auth::StoredAuthSession;

const SESSION_FILE_NAME: &str = "6ixgo_auth.json";

/// Shared handle over the in-memory session and its persisted slot
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_path: PathBuf,
    current: Arc<RwLock<Option<StoredAuthSession>>>,
}

impl SessionHandle {
    /// Handle rooted at the app data dir; nothing is read until
    /// [`Self::load_persisted`] runs
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            session_path: data_dir.join(SESSION_FILE_NAME),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Boot-time restore of the persisted session into memory
    pub async fn load_persisted(&self) {
        let restored = match fs::read_to_string(&self.session_path).await {
            Ok(raw) => match serde_json::from_str::<StoredAuthSession>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!("Stored session is not parsable ({}), treating as signed out", e);
                    None
                }
            },
            Err(_) => None,
        };

        if restored.is_some() {
            info!("Restored persisted session for header injection");
        }
        *self.current.write().await = restored;
    }

    /// Establish a fresh session (login success path) and persist it
    pub async fn establish(&self, session: StoredAuthSession) -> Result<()> {
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create data dir {}", parent.display()))?;
        }
        let serialized =
            serde_json::to_string(&session).context("Failed to serialize session")?;
        fs::write(&self.session_path, serialized)
            .await
            .with_context(|| format!("Failed to write {}", self.session_path.display()))?;

        *self.current.write().await = Some(session);
        Ok(())
    }

    /// Drop the session from memory and disk (logout and 401 path).
    /// A missing slot file is not an error.
    pub async fn clear(&self) {
        *self.current.write().await = None;
        if let Err(e) = fs::remove_file(&self.session_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove session file: {}", e);
            }
        }
    }

    /// Bearer token for the Authorization header, if signed in
    pub async fn access_token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    pub async fn snapshot(&self) -> Option<StoredAuthSession> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }
}
