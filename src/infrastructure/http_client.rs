//! HTTP client for the three console backends
//!
//! Wraps one reqwest client behind the per-service base URLs, injects the
//! fixed headers every request carries (`X-Locale-Code`,
//! `X-TimeZone-Offset`, `X-Origin`, bearer token when signed in), unwraps
//! the `{message, data, ts}` response envelope, and normalizes every
//! failure - transport or HTTP - into one [`ApiError`] shape. Raw reqwest
//! errors never reach display logic.
//!
//! A 401 from any backend clears the session slot and fires the registered
//! unauthorized hook; queries get a single automatic retry and no more.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::domain::constants::locale::DEFAULT_LOCALE_CODE;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::session_store::SessionHandle;

const REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Structured error entry from the backend error payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

/// Error payload format shared by all three backends
#[derive(Debug, Clone, Default, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Vec<ApiErrorDetail>>,
}

/// Success envelope shared by all three backends
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: String,
    pub data: T,
    #[serde(default)]
    pub ts: String,
}

/// Body envelope for write requests (`{ "data": ... }`)
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope<T> {
    pub data: T,
}

/// The one normalized failure shape every UI surface consumes
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// HTTP status; 0 for transport-level failures
    pub status: u16,
    pub code: Option<String>,
    pub details: Option<Vec<ApiErrorDetail>>,
}

impl ApiError {
    fn transport(error: &reqwest::Error) -> Self {
        let message = if error.is_connect() || error.is_timeout() {
            "Unable to connect to server. Please check your connection.".to_owned()
        } else {
            error.to_string()
        };
        Self {
            message,
            status: 0,
            code: None,
            details: None,
        }
    }

    fn decode(error: &reqwest::Error) -> Self {
        Self {
            message: format!("Unexpected response format: {error}"),
            status: 0,
            code: None,
            details: None,
        }
    }

    /// Normalize an HTTP error response body into the uniform shape.
    ///
    /// Prefers the per-detail descriptions (most user-friendly), falls back
    /// to the message field with any non-production trace suffix stripped,
    /// then to a status-derived default.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap_or_default();

        let details = parsed.data.filter(|details| !details.is_empty());
        let code = details
            .as_ref()
            .and_then(|details| details.first())
            .map(|detail| detail.code.clone());

        let message = if let Some(details) = details.as_ref() {
            details
                .iter()
                .map(|detail| detail.description.as_str())
                .collect::<Vec<_>>()
                .join(". ")
        } else if parsed.message.is_empty() {
            fallback_message(status)
        } else {
            match parsed.message.find(", Non-Production trace:") {
                Some(index) => parsed.message[..index].to_owned(),
                None => parsed.message,
            }
        };

        Self {
            message,
            status,
            code,
            details,
        }
    }
}

fn fallback_message(status: u16) -> String {
    match status {
        400 => "Invalid request. Please check your input.",
        401 => "Session expired. Please login again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource was not found.",
        500 => "Server error. Please try again later.",
        _ => "An unexpected error occurred.",
    }
    .to_owned()
}

/// Which backend a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiBase {
    Resource,
    Admin,
    Identity,
}

/// Hook fired after a 401 cleared the session (emits the redirect event)
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Shared HTTP client over the three backend services
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<RwLock<AppConfig>>,
    session: SessionHandle,
    on_unauthorized: Arc<RwLock<Option<UnauthorizedHook>>>,
}

impl ApiClient {
    pub fn new(config: Arc<RwLock<AppConfig>>, session: SessionHandle) -> anyhow::Result<Self> {
        // Cookie store mirrors the browser's withCredentials behavior
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            config,
            session,
            on_unauthorized: Arc::new(RwLock::new(None)),
        })
    }

    /// Register the 401 hook; called once during app wiring
    pub async fn set_unauthorized_hook(&self, hook: UnauthorizedHook) {
        *self.on_unauthorized.write().await = Some(hook);
    }

    /// GET a resource, unwrapping the response envelope. Queries get one
    /// automatic retry (never after a 401, which already signed us out).
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        base: ApiBase,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        match self.execute_get(base, path, query).await {
            Ok(value) => Ok(value),
            Err(error) if error.status != 401 => {
                debug!("Retrying query {} after failure: {}", path, error.message);
                self.execute_get(base, path, query).await
            }
            Err(error) => Err(error),
        }
    }

    async fn execute_get<T: DeserializeOwned>(
        &self,
        base: ApiBase,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.build_url(base, path, query).await?;
        let request = self.apply_headers(self.http.get(url)).await;
        let response = request.send().await.map_err(|e| ApiError::transport(&e))?;
        self.handle_response(response).await
    }

    /// POST with an optional body, unwrapping the response envelope.
    /// Mutations are never retried automatically.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        base: ApiBase,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.build_url(base, path, &[]).await?;
        let mut request = self.apply_headers(self.http.post(url)).await;
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| ApiError::transport(&e))?;
        self.handle_response(response).await
    }

    async fn build_url(
        &self,
        base: ApiBase,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Url, ApiError> {
        let endpoints = self.config.read().await.endpoints();
        let base_url = match base {
            ApiBase::Resource => endpoints.resource_api_url,
            ApiBase::Admin => endpoints.admin_api_url,
            ApiBase::Identity => endpoints.identity_api_url,
        };

        let mut url = Url::parse(&format!("{base_url}{path}")).map_err(|e| ApiError {
            message: format!("Invalid request URL: {e}"),
            status: 0,
            code: None,
            details: None,
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn apply_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let origin_url = self.config.read().await.endpoints().origin_url;
        let mut request = request
            .header("X-Locale-Code", DEFAULT_LOCALE_CODE)
            .header("X-TimeZone-Offset", timezone_offset_minutes().to_string())
            .header("X-Origin", origin_url);

        if let Some(token) = self.session.access_token().await {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        request
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            let envelope: ApiResponse<T> =
                response.json().await.map_err(|e| ApiError::decode(&e))?;
            return Ok(envelope.data);
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status_code, &body);

        if status == StatusCode::UNAUTHORIZED {
            warn!("401 received, clearing session and forcing re-login");
            self.session.clear().await;
            let hook = self.on_unauthorized.read().await.clone();
            if let Some(hook) = hook {
                hook();
            }
        }

        Err(error)
    }
}

/// Minutes to add to local time to reach UTC (JS `getTimezoneOffset` sign
/// convention: positive west of Greenwich)
#[must_use]
pub fn timezone_offset_minutes() -> i32 {
    use chrono::Offset;
    let offset_seconds = chrono::Local::now().offset().fix().local_minus_utc();
    -offset_seconds / 60
}
