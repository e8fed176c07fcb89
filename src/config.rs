//! Runtime configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes. The file is optional: without one the app talks to a local
//! inference server and exports into the user's download directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

pub const CONFIG_FILE_NAME: &str = "sketch_vision.json";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";

/// What to do with a generation response that arrives after the session
/// was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Store it anyway
    #[default]
    Apply,
    /// Drop it and leave the result slot empty
    Discard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Inference endpoint receiving `POST {"image": ...}`
    pub endpoint: String,
    /// Whole-request timeout (seconds). Inference is slow, keep it generous.
    pub request_timeout_secs: u64,
    /// TCP/TLS connect timeout (seconds)
    pub connect_timeout_secs: u64,
    /// Directory the generated image is exported into
    pub export_dir: PathBuf,
    pub stale_response_policy: StaleResponsePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
            export_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            stale_response_policy: StaleResponsePolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> PipelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PipelineError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> PipelineResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Load `path` if it exists, falling back to defaults on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        fs::write(path, self.to_json()?)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(PipelineError::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(PipelineError::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = AppConfig::from_json(r#"{"endpoint": "https://example.com/predict"}"#).unwrap();
        assert_eq!(config.endpoint, "https://example.com/predict");
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.stale_response_policy, StaleResponsePolicy::Apply);
    }

    #[test]
    fn test_policy_parses_snake_case() {
        let config = AppConfig::from_json(r#"{"stale_response_policy": "discard"}"#).unwrap();
        assert_eq!(config.stale_response_policy, StaleResponsePolicy::Discard);
    }

    #[test]
    fn test_json_round_trip() {
        let config = AppConfig {
            endpoint: "http://10.0.0.2:9000/predict".into(),
            request_timeout_secs: 30,
            connect_timeout_secs: 2,
            export_dir: PathBuf::from("/tmp/out"),
            stale_response_policy: StaleResponsePolicy::Discard,
        };
        let json = config.to_json().unwrap();
        assert_eq!(AppConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let result = AppConfig::from_json(r#"{"endpoint": "ftp://example.com"}"#);
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("{}.json", uuid::Uuid::new_v4()));
        let config = AppConfig::load_or_default(&path);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_save_failure_is_a_config_error() {
        let path = std::env::temp_dir()
            .join(uuid::Uuid::new_v4().to_string())
            .join("sketch_vision.json");

        let result = AppConfig::default().save(&path);
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("{}.json", uuid::Uuid::new_v4()));
        let config = AppConfig {
            stale_response_policy: StaleResponsePolicy::Discard,
            ..AppConfig::default()
        };

        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);

        fs::remove_file(&path).unwrap();
    }
}
