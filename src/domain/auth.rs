//! Authentication wire types and the persisted session shape

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Body of `POST /account/signin`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// Payload returned from the signin endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_roles: String,
    #[serde(default)]
    pub remember_me: bool,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub access_token_expiration: String,
    /// e.g. "00:30:00"
    #[serde(default)]
    pub access_token_exp: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub refresh_token_expiration: String,
    /// e.g. "30.00:00:00"
    #[serde(default)]
    pub refresh_token_exp: String,
    #[serde(default)]
    pub audience: String,
}

/// Serialized session persisted in the single auth slot.
///
/// Absence or parse failure of the slot means unauthenticated - never an
/// error surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoredAuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user_name: String,
    pub user_roles: String,
    pub access_token_expiration: String,
    pub refresh_token_expiration: String,
}

impl From<LoginData> for StoredAuthSession {
    fn from(data: LoginData) -> Self {
        Self {
            access_token: data.access_token,
            refresh_token: data.refresh_token,
            user_name: data.user_name,
            user_roles: data.user_roles,
            access_token_expiration: data.access_token_expiration,
            refresh_token_expiration: data.refresh_token_expiration,
        }
    }
}

/// Snapshot handed to the frontend for route guarding
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_roles: Option<String>,
}

impl AuthStatus {
    #[must_use]
    pub fn from_session(session: Option<&StoredAuthSession>) -> Self {
        match session {
            Some(session) => Self {
                is_authenticated: true,
                user_name: Some(session.user_name.clone()),
                user_roles: Some(session.user_roles.clone()),
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_data_converts_to_stored_session() {
        let data = LoginData {
            user_name: "cs-agent".into(),
            user_roles: "CsAdmin".into(),
            access_token: "at".into(),
            refresh_token: "rt".into(),
            access_token_expiration: "2026-01-01T00:00:00Z".into(),
            refresh_token_expiration: "2026-02-01T00:00:00Z".into(),
            ..Default::default()
        };

        let session = StoredAuthSession::from(data);
        assert_eq!(session.access_token, "at");
        assert_eq!(session.user_name, "cs-agent");

        let status = AuthStatus::from_session(Some(&session));
        assert!(status.is_authenticated);
        assert_eq!(status.user_name.as_deref(), Some("cs-agent"));
    }

    #[test]
    fn missing_session_means_unauthenticated() {
        let status = AuthStatus::from_session(None);
        assert!(!status.is_authenticated);
        assert!(status.user_name.is_none());
    }
}
