use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{DEFAULT_SAVE_FOLDER, DEFAULT_THUMBNAIL_SIZE};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_save_folder() -> String {
    DEFAULT_SAVE_FOLDER.to_string()
}

fn default_thumbnail_size() -> u32 {
    DEFAULT_THUMBNAIL_SIZE
}

/// Client settings, read from an optional JSON file.
///
/// ```json
/// { "serverUrl": "http://nas:3000", "keys": { "compare": { "k": "saveImage" } } }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default = "default_save_folder")]
    pub save_folder: String,

    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    /// Extra bindings per context, merged over the defaults.
    #[serde(default)]
    pub keys: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            save_folder: default_save_folder(),
            thumbnail_size: default_thumbnail_size(),
            keys: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config {}", path.display()))?;
        let cfg: ClientConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads `path` when given, then applies an explicit server override.
    pub fn resolve(path: Option<&Path>, server: Option<String>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        if let Some(server) = server {
            cfg.server_url = server;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.save_folder.is_empty() || self.save_folder.contains(['/', '\\']) {
            anyhow::bail!(
                "saveFolder must be a single folder name (got {:?})",
                self.save_folder
            );
        }
        if !(1..=1000).contains(&self.thumbnail_size) {
            anyhow::bail!(
                "thumbnailSize must be between 1 and 1000 (got {})",
                self.thumbnail_size
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
