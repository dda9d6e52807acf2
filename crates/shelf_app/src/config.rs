use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shelf_core::DEFAULT_PAGE_LIMIT;
use shelf_engine::ClientSettings;
use shelf_logging::{shelf_debug, shelf_info};

pub const DEFAULT_CONFIG_FILE: &str = "shelf.ron";

/// Settings read from the RON config file. Absent fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub page_limit: u32,
    pub credentials_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientSettings::default(),
            page_limit: DEFAULT_PAGE_LIMIT,
            credentials_path: PathBuf::from(".shelf_credentials.ron"),
        }
    }
}

impl AppConfig {
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                shelf_debug!("no config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read config {:?}", path))
            }
        };

        let config: AppConfig = ron::from_str(&content)
            .with_context(|| format!("failed to parse config {:?}", path))?;
        if config.page_limit == 0 {
            anyhow::bail!("page_limit in {:?} must be greater than zero", path);
        }
        shelf_info!("loaded config from {:?}", path);
        Ok(config)
    }
}
