use anyhow::Context;
use blockshelf_compiler_table::ThemeColors;
use blockshelf_editor::{PreviewOptions, DEFAULT_OBSERVER_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_CONFIG_NAME: &str = "blockshelf.config.json";

/// Blockshelf configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding `<path>.plain.html` library documents
    #[serde(default = "default_library_dir")]
    pub library_dir: String,

    /// Origin library paths are served from
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Table header colors
    #[serde(default)]
    pub theme: ThemeColors,

    /// Bound of the edit batch channel
    #[serde(default = "default_observer_capacity")]
    pub observer_capacity: usize,
}

fn default_library_dir() -> String {
    "library".to_string()
}

fn default_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_observer_capacity() -> usize {
    DEFAULT_OBSERVER_CAPACITY
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Cannot read {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", DEFAULT_CONFIG_NAME))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the library directory
    pub fn get_library_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.library_dir)
    }

    pub fn origin_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.origin).with_context(|| format!("Invalid origin: {}", self.origin))
    }

    pub fn preview_options(&self) -> anyhow::Result<PreviewOptions> {
        let mut options = PreviewOptions::new(self.origin_url()?);
        options.theme = self.theme.clone();
        options.observer_capacity = self.observer_capacity;
        Ok(options)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_dir: default_library_dir(),
            origin: default_origin(),
            theme: ThemeColors::default(),
            observer_capacity: default_observer_capacity(),
        }
    }
}
