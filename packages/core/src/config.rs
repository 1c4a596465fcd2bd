//! Runtime configuration
//!
//! `FolioConfig` is the single source of truth for what the running process
//! uses. It is read once at startup:
//!
//! 1. JSON file at `$FOLIO_CONFIG`, else `~/.folio/config.json` (optional)
//! 2. `FOLIO_*` environment variables override individual settings
//! 3. `validate()` rejects combinations that cannot work
//!
//! Every field has a default, so a partial file deserializes without error.

use crate::models::MAX_IMAGE_BYTES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE: &str = "config.json";
const CONFIG_DIR: &str = ".folio";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which backend the process talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process stores; nothing leaves the machine
    #[default]
    Memory,
    /// Hosted Firestore + Firebase Storage + Identity Toolkit
    Firebase,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "firebase" => Ok(Backend::Firebase),
            other => Err(ConfigError::Invalid(format!(
                "unknown backend '{}', expected 'memory' or 'firebase'",
                other
            ))),
        }
    }
}

/// Hosted project settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirebaseConfig {
    pub project_id: String,

    /// Named Firestore database; `(default)` unless the project uses another
    pub database_id: String,

    pub storage_bucket: String,

    /// Web API key, sent as the `key` query parameter
    pub api_key: String,

    /// Optional OAuth/ID token sent as a bearer credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Base URLs, overridable for the local emulators
    pub firestore_endpoint: String,
    pub storage_endpoint: String,
    pub identity_endpoint: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database_id: "(default)".to_string(),
            storage_bucket: String::new(),
            api_key: String::new(),
            access_token: None,
            firestore_endpoint: "https://firestore.googleapis.com/v1".to_string(),
            storage_endpoint: "https://firebasestorage.googleapis.com/v0".to_string(),
            identity_endpoint: "https://identitytoolkit.googleapis.com/v1".to_string(),
        }
    }
}

/// Upload acceptance and cosmetic progress settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadConfig {
    /// Interval between simulated progress steps
    pub tick_ms: u64,
    /// Percentage added per tick
    pub step: u8,
    /// Simulated progress never passes this until the upload resolves
    pub ceiling: u8,
    /// Largest accepted file
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            step: 5,
            ceiling: 95,
            max_bytes: MAX_IMAGE_BYTES,
        }
    }
}

impl UploadConfig {
    /// Tick interval, never shorter than 1 ms
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

/// Complete process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolioConfig {
    pub backend: Backend,
    pub firebase: FirebaseConfig,
    pub request_timeout_secs: u64,
    pub upload: UploadConfig,
    pub server: ServerConfig,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            firebase: FirebaseConfig::default(),
            request_timeout_secs: 30,
            upload: UploadConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl FolioConfig {
    /// Load from file (if any) and the process environment, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var("FOLIO_CONFIG") {
            Ok(custom) => Some(PathBuf::from(custom)),
            Err(_) => default_config_path(),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `FOLIO_*` overrides using `lookup` to read variables.
    ///
    /// Taking the lookup as a parameter keeps tests away from the real
    /// process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("FOLIO_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(project_id) = lookup("FOLIO_PROJECT_ID") {
            self.firebase.project_id = project_id;
        }
        if let Some(database_id) = lookup("FOLIO_DATABASE_ID") {
            self.firebase.database_id = database_id;
        }
        if let Some(bucket) = lookup("FOLIO_STORAGE_BUCKET") {
            self.firebase.storage_bucket = bucket;
        }
        if let Some(api_key) = lookup("FOLIO_API_KEY") {
            self.firebase.api_key = api_key;
        }
        if let Some(token) = lookup("FOLIO_ACCESS_TOKEN") {
            self.firebase.access_token = Some(token);
        }
        if let Some(port) = lookup("FOLIO_SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| {
                ConfigError::Invalid(format!("FOLIO_SERVER_PORT is not a port: {}", port))
            })?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == Backend::Firebase {
            for (name, value) in [
                ("projectId", &self.firebase.project_id),
                ("storageBucket", &self.firebase.storage_bucket),
                ("apiKey", &self.firebase.api_key),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "firebase backend requires firebase.{}",
                        name
                    )));
                }
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "requestTimeoutSecs must be greater than 0".to_string(),
            ));
        }

        let upload = &self.upload;
        if upload.tick_ms == 0 || upload.step == 0 {
            return Err(ConfigError::Invalid(
                "upload.tickMs and upload.step must be greater than 0".to_string(),
            ));
        }
        if upload.ceiling >= 100 {
            return Err(ConfigError::Invalid(
                "upload.ceiling must stay below 100".to_string(),
            ));
        }
        if upload.max_bytes == 0 {
            return Err(ConfigError::Invalid(
                "upload.maxBytes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `~/.folio/config.json`, when a home directory can be determined
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FolioConfig::default();
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.firebase.database_id, "(default)");
        assert_eq!(config.upload.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.upload.ceiling, 95);
        assert_eq!(config.server.port, 3001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_tick_is_clamped() {
        let upload = UploadConfig {
            tick_ms: 0,
            ..Default::default()
        };
        assert_eq!(upload.tick(), Duration::from_millis(1));
        assert_eq!(UploadConfig::default().tick(), Duration::from_millis(100));
    }

    #[test]
    fn test_firebase_backend_requires_project_settings() {
        let mut config = FolioConfig {
            backend: Backend::Firebase,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.firebase.project_id = "demo".to_string();
        config.firebase.storage_bucket = "demo.appspot.com".to_string();
        config.firebase.api_key = "key".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FOLIO_BACKEND", "Firebase"),
            ("FOLIO_PROJECT_ID", "portfolio"),
            ("FOLIO_DATABASE_ID", "portfolio2"),
            ("FOLIO_SERVER_PORT", "8080"),
        ]
        .into_iter()
        .collect();

        let mut config = FolioConfig::default();
        config
            .apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.backend, Backend::Firebase);
        assert_eq!(config.firebase.project_id, "portfolio");
        assert_eq!(config.firebase.database_id, "portfolio2");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_bad_port_override_rejected() {
        let mut config = FolioConfig::default();
        let result = config.apply_env_overrides(|key| {
            (key == "FOLIO_SERVER_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "firebase": {{ "projectId": "demo" }}, "upload": {{ "tickMs": 10 }} }}"#
        )
        .unwrap();

        let config = FolioConfig::from_file(file.path()).unwrap();
        assert_eq!(config.firebase.project_id, "demo");
        assert_eq!(config.firebase.database_id, "(default)");
        assert_eq!(config.upload.tick_ms, 10);
        assert_eq!(config.upload.step, 5);
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = FolioConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
