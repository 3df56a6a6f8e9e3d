use crate::error::Result;
use crate::history::DEFAULT_MAX_HISTORY;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub max_history: usize,
    pub default_width: usize,
    pub default_height: usize,
    /// Screen pixels per grid cell handed to the renderer.
    pub pixel_size: u32,
    pub show_grid: bool,
    pub storage_quota_bytes: usize,
    /// Longest edge of the thumbnail stored with a document.
    pub thumbnail_size: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            default_width: 32,
            default_height: 32,
            pixel_size: 16,
            show_grid: true,
            storage_quota_bytes: 5 * 1024 * 1024,
            thumbnail_size: 64,
        }
    }
}

impl EditorConfig {
    /// Reads a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        log::debug!("loaded editor config: {:?}", config);
        Ok(config)
    }
}
