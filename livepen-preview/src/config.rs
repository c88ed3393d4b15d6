//! Preview configuration: YAML file plus environment overrides.

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::error::{PreviewError, PreviewResult};
use crate::frame::FrameOptions;
use crate::sandbox::Capabilities;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Env var overriding `debounce_ms`.
pub const DEBOUNCE_ENV: &str = "LIVEPEN_DEBOUNCE_MS";

/// Upper bound for the debounce delay.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub debounce_ms: u64,
    pub capabilities: Capabilities,
    pub frame: FrameOptions,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            capabilities: Capabilities::default(),
            frame: FrameOptions::default(),
        }
    }
}

impl PreviewConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn from_yaml_str(yaml: &str) -> PreviewResult<Self> {
        let config: PreviewConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML file, then applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> PreviewResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&yaml)?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> PreviewResult<()> {
        if let Ok(raw) = std::env::var(DEBOUNCE_ENV) {
            self.debounce_ms = raw.trim().parse().map_err(|_| {
                PreviewError::Config(format!(
                    "{} must be a number of milliseconds, got '{}'",
                    DEBOUNCE_ENV, raw
                ))
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> PreviewResult<()> {
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(PreviewError::Config(format!(
                "debounce_ms {} exceeds maximum of {}",
                self.debounce_ms, MAX_DEBOUNCE_MS
            )));
        }
        if self.capabilities.is_escapable() {
            return Err(PreviewError::Config(
                "capabilities cannot allow scripts together with same_origin".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = PreviewConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.capabilities, Capabilities::scripts_only());
        assert_eq!(config.frame.title, "Output");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config =
            PreviewConfig::from_yaml_str("debounce_ms: 250\nframe:\n  height: 480px\n").unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.frame.height, "480px");
        assert_eq!(config.frame.width, "100%");
        assert!(config.capabilities.scripts);
    }

    #[test]
    fn test_rejects_escapable_capabilities() {
        let result = PreviewConfig::from_yaml_str("capabilities:\n  same_origin: true\n");
        assert!(matches!(result, Err(PreviewError::Config(_))));
    }

    #[test]
    fn test_rejects_huge_debounce() {
        let result = PreviewConfig::from_yaml_str("debounce_ms: 60000\n");
        assert!(matches!(result, Err(PreviewError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.yaml");
        std::fs::write(&path, "capabilities:\n  forms: true\n").unwrap();

        let config = PreviewConfig::load(&path).unwrap();
        assert_eq!(config.capabilities.sandbox_attr(), "allow-scripts allow-forms");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = PreviewConfig::load("/nonexistent/livepen/preview.yaml");
        assert!(matches!(result, Err(PreviewError::Io(_))));
    }
}
