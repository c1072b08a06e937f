//! YAML-based diagram configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```yaml
//! layout:
//!   rank_dir: LR
//!   node_sep: 24
//! html:
//!   title: "ALU"
//!   script_url: "https://cdn.example.org/digitaljs/main.js"
//! ```
//!
//! ```rust
//! use gatediagram::config::DiagramConfig;
//!
//! // let config = DiagramConfig::load("diagram.yaml").unwrap();
//! let config = DiagramConfig::default();
//! assert_eq!(config.layout.margin_x, 256);
//! ```

use gatediagram_layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub layout: LayoutConfig,
    pub html: HtmlConfig,
}

/// Settings for the standalone HTML page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Page title; the root module name when unset.
    pub title: Option<String>,
    /// Viewer script.
    pub script_url: String,
    /// Viewer stylesheet.
    pub style_url: String,
    /// Global object the viewer script exports.
    pub viewer: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            title: None,
            script_url: "dist/main.js".to_string(),
            style_url: "dist/main.css".to_string(),
            viewer: "digitaljs".to_string(),
        }
    }
}

impl DiagramConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(src: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(src)?;
        Ok(config)
    }
}
