//! TOML-based engine configuration.
//!
//! The replay binary reads its engine settings from one file, passed with
//! `--config` (default `touchmap.toml`). A missing file is not an error; the
//! defaults below apply.
//!
//! # What goes in the file?
//!
//! Only the settings of the engine itself: the keyboard-observation tick
//! period, the log filter used when `RUST_LOG` is unset, the initial crosshair
//! readiness, and the window the touch coordinates are clamped to. Mapping
//! records are not configuration; they come from the mapping provider (or,
//! for the replay tool, from the scenario file).
//!
//! ```toml
//! [engine]
//! tick_interval_ms = 50
//! log_level = "info"
//! crosshair_ready = false
//!
//! [window]
//! max_width = 1920   # 0 leaves the axis unbounded above
//! max_height = 1080
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "...")]` fall back to the named
//! function when absent. A partial file, or one written before a field
//! existed, still yields a usable configuration.
//!
//! # Validation
//!
//! Parsing accepts any integers. [`EngineConfig::to_settings`] is where the
//! values are checked: a zero tick interval is rejected there with
//! [`ConfigError::ZeroTickInterval`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use touchmap_core::{DeviceType, WindowInfo};

use crate::application::engine::EngineSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("tick_interval_ms must be greater than zero")]
    ZeroTickInterval,
}

// ── Config schema types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub window: WindowSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSection {
    /// Keyboard-observation tick period in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Initial crosshair readiness for mouse-left-fire.
    #[serde(default)]
    pub crosshair_ready: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WindowSection {
    #[serde(default)]
    pub max_width: i32,
    #[serde(default)]
    pub max_height: i32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_tick_interval_ms() -> u64 {
    50
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            log_level: default_log_level(),
            crosshair_ready: false,
        }
    }
}

impl EngineConfig {
    /// Engine settings for a session of `device_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTickInterval`] for a zero tick period,
    /// which tokio's interval timer rejects.
    pub fn to_settings(&self, device_type: DeviceType) -> Result<EngineSettings, ConfigError> {
        if self.engine.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(EngineSettings {
            device_type,
            tick_interval: Duration::from_millis(self.engine.tick_interval_ms),
            window_info: WindowInfo::new(self.window.max_width, self.window.max_height),
            crosshair_ready: self.engine.crosshair_ready,
        })
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Loads `EngineConfig` from `path`, returning the defaults if the file does
/// not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EngineConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &EngineConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_ticks_every_fifty_ms() {
        // Arrange / Act
        let settings = EngineConfig::default().to_settings(DeviceType::Keyboard).unwrap();

        // Assert
        assert_eq!(settings.tick_interval, Duration::from_millis(50));
        assert_eq!(settings.window_info, WindowInfo::default());
        assert!(!settings.crosshair_ready);
    }

    #[test]
    fn test_partial_toml_keeps_defaults_for_missing_fields() {
        let toml_str = r#"
[window]
max_width = 1920
"#;

        let cfg: EngineConfig = toml::from_str(toml_str).expect("deserialize partial");

        assert_eq!(cfg.window.max_width, 1920);
        assert_eq!(cfg.window.max_height, 0);
        assert_eq!(cfg.engine.tick_interval_ms, 50);
        assert_eq!(cfg.engine.log_level, "info");
    }

    #[test]
    fn test_zero_tick_interval_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.engine.tick_interval_ms = 0;

        let result = cfg.to_settings(DeviceType::Keyboard);

        assert!(matches!(result, Err(ConfigError::ZeroTickInterval)));
    }

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let dir = tempfile::tempdir().unwrap();

        let cfg = load_config(&dir.path().join("missing.toml")).unwrap();

        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn test_load_config_reports_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_config(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_then_load_preserves_settings() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("touchmap.toml");
        let mut cfg = EngineConfig::default();
        cfg.engine.crosshair_ready = true;
        cfg.engine.log_level = "debug".to_string();
        cfg.window = WindowSection {
            max_width: 2400,
            max_height: 1080,
        };

        // Act
        save_config(&path, &cfg).unwrap();
        let loaded = load_config(&path).unwrap();

        // Assert
        assert_eq!(loaded, cfg);
    }
}
