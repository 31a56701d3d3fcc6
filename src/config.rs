//! Runtime configuration: where the artifacts live and how to fetch them.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::data::fetch::{Artifact, ArtifactSource};

pub const DEFAULT_MODEL_DRIVE_ID: &str = "1IO1dSxxuYlJyeTlQltoQKyKA55Pw8fE3";
pub const DEFAULT_COLUMNS_URL: &str =
    "https://raw.githubusercontent.com/YourUserName/YourRepoName/main/path/to/model_columns.json";
pub const DEFAULT_MODEL_PATH: &str = "pollution_model.json";
pub const DEFAULT_COLUMNS_PATH: &str = "model_columns.json";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_source: ArtifactSource,
    pub columns_url: String,
    pub model_path: PathBuf,
    pub columns_path: PathBuf,
    pub http_timeout: Duration,
    /// Optional SHA-256 (hex) the downloaded model must match.
    pub model_sha256: Option<String>,
    /// Optional SHA-256 (hex) the downloaded schema must match.
    pub columns_sha256: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_source: ArtifactSource::GoogleDrive {
                file_id: DEFAULT_MODEL_DRIVE_ID.to_string(),
            },
            columns_url: DEFAULT_COLUMNS_URL.to_string(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            columns_path: PathBuf::from(DEFAULT_COLUMNS_PATH),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            model_sha256: None,
            columns_sha256: None,
        }
    }
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get("WQ_MODEL_URL") {
            config.model_source = ArtifactSource::Url(url);
        } else if let Some(file_id) = get("WQ_MODEL_DRIVE_ID") {
            config.model_source = ArtifactSource::GoogleDrive { file_id };
        }
        if let Some(url) = get("WQ_COLUMNS_URL") {
            config.columns_url = url;
        }
        if let Some(path) = get("WQ_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Some(path) = get("WQ_COLUMNS_PATH") {
            config.columns_path = PathBuf::from(path);
        }
        if let Some(raw) = get("WQ_HTTP_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout = Duration::from_secs(secs),
                _ => log::warn!(
                    "Ignoring WQ_HTTP_TIMEOUT_SECS={raw:?}; using {DEFAULT_HTTP_TIMEOUT_SECS}s"
                ),
            }
        }
        config.model_sha256 = get("WQ_MODEL_SHA256");
        config.columns_sha256 = get("WQ_COLUMNS_SHA256");

        log::debug!("Configuration: {config:?}");
        config
    }

    pub fn model_artifact(&self) -> Artifact {
        Artifact {
            label: "model".to_string(),
            source: self.model_source.clone(),
            path: self.model_path.clone(),
            sha256: self.model_sha256.clone(),
        }
    }

    pub fn columns_artifact(&self) -> Artifact {
        Artifact {
            label: "model columns".to_string(),
            source: ArtifactSource::Url(self.columns_url.clone()),
            path: self.columns_path.clone(),
            sha256: self.columns_sha256.clone(),
        }
    }
}
