//! Configuration infrastructure
//!
//! Environment-profile based endpoint resolution plus an optional JSON
//! settings file. The console talks to three backends (resource catalog,
//! admin/product API, identity API) whose base URLs are fixed per
//! environment; a settings file can pin the environment and tune logging
//! but endpoints themselves are not user-editable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

/// Deployment environment the console points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Staging backends (also the localhost default)
    #[default]
    Staging,
    Production,
}

impl Environment {
    /// Display name for the header badge
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }
}

/// Base URLs of the three backend services plus the origin we present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointProfile {
    pub resource_api_url: String,
    pub admin_api_url: String,
    pub identity_api_url: String,
    pub origin_url: String,
}

impl EndpointProfile {
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Staging => Self {
                resource_api_url: "https://staging-api.6ixgo.com/api/v1".into(),
                admin_api_url: "https://staging-admin-api.6ixgo.com/api/v1".into(),
                identity_api_url: "https://staging-identity.6ixgo.com/id/v1".into(),
                origin_url: "https://staging-admin.6ixgo.com".into(),
            },
            Environment::Production => Self {
                resource_api_url: "https://b2c.api.6ixgo.com/api/v1".into(),
                admin_api_url: "https://admin-api.6ixgo.com/api/v1".into(),
                identity_api_url: "https://identity.6ixgo.com/id/v1".into(),
                origin_url: "https://admin.6ixgo.com".into(),
            },
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            console_output: true,
            file_output: true,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub environment: Environment,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Endpoint profile for the active environment
    #[must_use]
    pub fn endpoints(&self) -> EndpointProfile {
        EndpointProfile::for_environment(self.environment)
    }
}

/// Loads and persists the settings file under the platform config dir
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Settings live at `<config_dir>/sixgo-cs-console/settings.json`
    #[must_use]
    pub fn from_default_location() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            config_path: base.join("sixgo-cs-console").join("settings.json"),
        }
    }

    #[must_use]
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Load the settings file; a missing or unparsable file yields defaults
    pub async fn load(&self) -> AppConfig {
        match fs::read_to_string(&self.config_path).await {
            Ok(raw) => match serde_json::from_str::<AppConfig>(&raw) {
                Ok(config) => {
                    info!("Loaded settings from {}", self.config_path.display());
                    config
                }
                Err(e) => {
                    warn!(
                        "Settings file {} is not parsable ({}), using defaults",
                        self.config_path.display(),
                        e
                    );
                    AppConfig::default()
                }
            },
            Err(_) => AppConfig::default(),
        }
    }

    /// Persist the settings file, creating parent directories as needed
    pub async fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        let serialized =
            serde_json::to_string_pretty(config).context("Failed to serialize settings")?;
        fs::write(&self.config_path, serialized)
            .await
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_is_the_default_environment() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Staging);
        assert!(config.endpoints().admin_api_url.contains("staging"));
    }

    #[test]
    fn production_profile_uses_production_hosts() {
        let endpoints = EndpointProfile::for_environment(Environment::Production);
        assert_eq!(endpoints.admin_api_url, "https://admin-api.6ixgo.com/api/v1");
        assert_eq!(endpoints.origin_url, "https://admin.6ixgo.com");
    }

    #[tokio::test]
    async fn load_returns_defaults_for_missing_or_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("settings.json"));
        assert_eq!(manager.load().await.environment, Environment::Staging);

        tokio::fs::write(dir.path().join("settings.json"), "{not json")
            .await
            .unwrap();
        assert_eq!(manager.load().await.environment, Environment::Staging);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("settings.json"));

        let config = AppConfig {
            environment: Environment::Production,
            ..Default::default()
        };
        manager.save(&config).await.unwrap();
        assert_eq!(manager.load().await.environment, Environment::Production);
    }
}
