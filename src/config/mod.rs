use crate::media::imgur::DEFAULT_API_BASE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub download: DownloadConfig,
    pub imgur: ImgurSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// "json" or "pretty"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DownloadConfig {
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ImgurSettings {
    pub client_id: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for ImgurSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ImgurSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn get_logging_format(&self) -> &str {
        &self.logging.format
    }

    /// Configured directory, else `<user downloads>/mediagrab`, else `./downloads`.
    pub fn download_dir(&self) -> PathBuf {
        self.download.directory.clone().unwrap_or_else(|| {
            dirs::download_dir()
                .map(|dir| dir.join("mediagrab"))
                .unwrap_or_else(|| PathBuf::from("downloads"))
        })
    }

    /// Environment variables win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(client_id) = std::env::var("IMGUR_CLIENT_ID") {
            if !client_id.is_empty() {
                self.imgur.client_id = client_id;
            }
        }
    }
}
