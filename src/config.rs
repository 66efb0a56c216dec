use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytcap/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytcap")
        .join("config.toml")
}

/// Credentials for the captions API, read from the environment once at
/// startup and handed to the fetcher explicitly.
///
/// The list call authenticates with the API key, the download call with the
/// OAuth bearer token. A missing variable becomes an empty value; the
/// upstream rejection is surfaced to the caller like any other fetch failure.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub api_key: String,
    pub access_token: String,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("YOUTUBE_API_KEY").unwrap_or_default(),
            access_token: std::env::var("YOUTUBE_ACCESS_TOKEN").unwrap_or_default(),
        }
    }
}
