//! Backend configuration for client apps.
//!
//! Provides a unified `BackendConfig` used by desktop and CLI to discover the
//! managed GraphQL endpoint, its realtime endpoint, and the credentials handed
//! over by the external sign-in flow.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::state::SyncMode;
use crate::util::{is_http_url, is_ws_url, normalize_text_option, websocket_url_for};

pub const ENV_GRAPHQL_URL: &str = "NOTEMAKER_GRAPHQL_URL";
pub const ENV_REALTIME_URL: &str = "NOTEMAKER_REALTIME_URL";
pub const ENV_API_KEY: &str = "NOTEMAKER_API_KEY";
pub const ENV_AUTH_TOKEN: &str = "NOTEMAKER_AUTH_TOKEN";
pub const ENV_SYNC_MODE: &str = "NOTEMAKER_SYNC_MODE";

/// Credentials attached to every remote call.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Sent as `x-api-key`
    pub api_key: Option<String>,
    /// Sent as `Authorization: Bearer ...`
    pub auth_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Resolved backend configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    /// GraphQL HTTP endpoint; `None` selects the local in-memory backend
    pub graphql_url: Option<String>,
    /// GraphQL WebSocket endpoint for subscriptions
    pub realtime_url: Option<String>,
    pub credentials: Credentials,
    pub mode: SyncMode,
}

/// On-disk form of the configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub graphql_url: Option<String>,
    #[serde(default)]
    pub realtime_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub sync_mode: Option<String>,
}

impl BackendConfig {
    /// Whether a managed backend is configured.
    pub const fn is_remote(&self) -> bool {
        self.graphql_url.is_some()
    }

    /// Build from `NOTEMAKER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_file(ConfigFile::default().overlaid_with_env())
    }

    /// Parse a JSON config payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(payload)
            .map_err(|error| Error::Config(format!("invalid config JSON: {error}")))?;
        Self::from_file(file)
    }

    /// Load a JSON config file, then let environment variables override it.
    ///
    /// A missing file is treated as empty.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|error| {
                Error::Config(format!(
                    "failed to read config at {}: {error}",
                    path.display()
                ))
            })?;
            serde_json::from_str::<ConfigFile>(&raw).map_err(|error| {
                Error::Config(format!(
                    "failed to parse config at {}: {error}",
                    path.display()
                ))
            })?
        } else {
            ConfigFile::default()
        };
        Self::from_file(file.overlaid_with_env())
    }

    /// Validate and normalize raw values.
    pub fn from_file(file: ConfigFile) -> Result<Self> {
        let graphql_url = normalize_text_option(file.graphql_url)
            .map(|url| normalize_http_url(&url, "graphql_url"))
            .transpose()?;

        let realtime_url = match normalize_text_option(file.realtime_url) {
            Some(url) => Some(normalize_ws_url(&url)?),
            None => graphql_url.as_deref().and_then(websocket_url_for),
        };

        let mode = match normalize_text_option(file.sync_mode) {
            Some(raw) => raw.parse::<SyncMode>().map_err(Error::Config)?,
            None => SyncMode::default(),
        };

        Ok(Self {
            graphql_url,
            realtime_url,
            credentials: Credentials {
                api_key: normalize_text_option(file.api_key),
                auth_token: normalize_text_option(file.auth_token),
            },
            mode,
        })
    }
}

impl ConfigFile {
    /// Environment variables take precedence over file values.
    #[must_use]
    pub fn overlaid_with_env(self) -> Self {
        self.overlaid_with(|key| std::env::var(key).ok())
    }

    fn overlaid_with(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, current: Option<String>| {
            normalize_text_option(lookup(key)).or(current)
        };
        Self {
            graphql_url: pick(ENV_GRAPHQL_URL, self.graphql_url),
            realtime_url: pick(ENV_REALTIME_URL, self.realtime_url),
            api_key: pick(ENV_API_KEY, self.api_key),
            auth_token: pick(ENV_AUTH_TOKEN, self.auth_token),
            sync_mode: pick(ENV_SYNC_MODE, self.sync_mode),
        }
    }
}

fn normalize_http_url(value: &str, field: &str) -> Result<String> {
    if is_http_url(value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(format!(
            "'{field}' must include http:// or https://"
        )))
    }
}

fn normalize_ws_url(value: &str) -> Result<String> {
    if is_ws_url(value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(Error::Config(
            "'realtime_url' must include ws:// or wss://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_config_is_local() {
        let config = BackendConfig::from_file(ConfigFile::default()).unwrap();
        assert!(!config.is_remote());
        assert_eq!(config.realtime_url, None);
        assert_eq!(config.mode, SyncMode::Direct);
    }

    #[test]
    fn realtime_url_derives_from_graphql_url() {
        let config = BackendConfig::from_json(
            r#"{ "graphql_url": " https://api.example.com/graphql/ ", "sync_mode": "subscription" }"#,
        )
        .unwrap();
        assert_eq!(
            config.graphql_url.as_deref(),
            Some("https://api.example.com/graphql")
        );
        assert_eq!(
            config.realtime_url.as_deref(),
            Some("wss://api.example.com/graphql")
        );
        assert_eq!(config.mode, SyncMode::Subscription);
    }

    #[test]
    fn explicit_realtime_url_wins() {
        let config = BackendConfig::from_json(
            r#"{ "graphql_url": "https://api.example.com/graphql", "realtime_url": "wss://rt.example.com/graphql" }"#,
        )
        .unwrap();
        assert_eq!(
            config.realtime_url.as_deref(),
            Some("wss://rt.example.com/graphql")
        );
    }

    #[test]
    fn rejects_http_realtime_url() {
        let error = BackendConfig::from_json(
            r#"{ "graphql_url": "https://api.example.com/graphql", "realtime_url": "https://rt.example.com/graphql" }"#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("realtime_url"));
    }

    #[test]
    fn rejects_non_http_graphql_url() {
        let error = BackendConfig::from_json(r#"{ "graphql_url": "api.example.com" }"#).unwrap_err();
        assert!(error.to_string().contains("graphql_url"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let error = BackendConfig::from_json(r#"{ "graphql_uri": "https://x" }"#).unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }

    #[test]
    fn rejects_unknown_sync_mode() {
        assert!(BackendConfig::from_json(r#"{ "sync_mode": "push" }"#).is_err());
    }

    #[test]
    fn env_values_override_file_values() {
        let env = HashMap::from([
            (ENV_API_KEY, "env-key".to_string()),
            (ENV_SYNC_MODE, "   ".to_string()),
        ]);
        let file = ConfigFile {
            api_key: Some("file-key".to_string()),
            sync_mode: Some("subscription".to_string()),
            ..Default::default()
        }
        .overlaid_with(|key| env.get(key).cloned());

        assert_eq!(file.api_key.as_deref(), Some("env-key"));
        assert_eq!(file.sync_mode.as_deref(), Some("subscription"));
    }

    #[test]
    fn load_from_path_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "graphql_url": "http://localhost:4000/graphql", "auth_token": "tok" }"#,
        )
        .unwrap();

        let config = BackendConfig::load_from_path(&path).unwrap();
        assert!(config.is_remote());
        assert!(config.credentials.auth_token.is_some());
    }

    #[test]
    fn credentials_debug_redacts_secrets() {
        let credentials = Credentials {
            api_key: Some("da2-secret".to_string()),
            auth_token: None,
        };
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("da2-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
