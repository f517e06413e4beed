use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Startup configuration. Constructed in `main` and passed down
/// explicitly; there is no process-wide config instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Initial surface size when windowed.
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    /// Nominal render cadence in ticks per second.
    pub tick_rate: u32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: true,
            tick_rate: 60,
        }
    }
}

impl VisualizerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = VisualizerConfig::default();
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert!(config.fullscreen);
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let config: VisualizerConfig =
            serde_json::from_str(r#"{"width": 1920, "fullscreen": false}"#).unwrap();
        assert_eq!(config.width, 1920);
        assert_eq!(config.height, 720);
        assert!(!config.fullscreen);
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(VisualizerConfig::load("/nope/visualizer.json").is_err());
    }

    #[test]
    fn no_path_means_defaults() {
        let config = VisualizerConfig::load_or_default(None).unwrap();
        assert_eq!(config, VisualizerConfig::default());
    }
}
