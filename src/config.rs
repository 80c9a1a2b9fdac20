//! Optional TOML configuration for analyzer defaults.
//!
//! Every field has a default, so a missing or empty file behaves like no
//! file at all. Flags still win over the file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use pagesight_dom::Viewport;
use pagesight_probes::{CollectOptions, DEFAULT_FLAG_ATTR, DEFAULT_MARKER_ATTR};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub collector: CollectorConfig,
    pub markers: MarkerConfig,
    /// Replaces the snapshot's recorded viewport when set.
    pub viewport: Option<Viewport>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct CollectorConfig {
    pub start_index: u64,
    pub flag_attr: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self { start_index: 0, flag_attr: DEFAULT_FLAG_ATTR.to_string() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct MarkerConfig {
    pub attr: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self { attr: DEFAULT_MARKER_ATTR.to_string() }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::load_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn load_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            start_index: self.collector.start_index,
            flag_attr: self.collector.flag_attr.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::load_str("").unwrap();
        assert_eq!(config.collector.start_index, 0);
        assert_eq!(config.collector.flag_attr, DEFAULT_FLAG_ATTR);
        assert_eq!(config.markers.attr, DEFAULT_MARKER_ATTR);
        assert!(config.viewport.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
            [collector]
            start_index = 40

            [viewport]
            width = 1920.0
            height = 1080.0
        "#;
        let config = Config::load_str(content).unwrap();
        assert_eq!(config.collector.start_index, 40);
        assert_eq!(config.collector.flag_attr, DEFAULT_FLAG_ATTR);
        let vp = config.viewport.unwrap();
        assert_eq!(vp.width, 1920.0);
        assert_eq!(vp.device_pixel_ratio, 1.0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[markers]").unwrap();
        writeln!(file, "attr = \"data-agent-click-id\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.markers.attr, "data-agent-click-id");
    }

    #[test]
    fn test_load_nonexistent_file() {
        assert!(Config::load(Path::new("/nonexistent/pagesight.toml")).is_err());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(Config::load_str("collector = [unclosed").is_err());
    }
}
