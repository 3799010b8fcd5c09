//! Configuration loading
//!
//! The whole configuration lives in one TOML file. A missing file is not an
//! error: every section falls back to its defaults.

use std::fs;
use std::path::{Path, PathBuf};

use dragonfin_types::DragonfinConfig;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },
    #[error("{owner}: invalid color {color:?}")]
    InvalidColor { owner: String, color: String },
    #[error("effect {id:?}: duration must be positive")]
    ZeroDuration { id: String },
    #[error("effect {id:?}: duration {duration_ms}ms exceeds the {max_ms}ms limit")]
    DurationTooLong {
        id: String,
        duration_ms: u64,
        max_ms: u64,
    },
    #[error("effect {id:?}: speed multiplier must be positive, got {multiplier}")]
    InvalidMultiplier { id: String, multiplier: f32 },
}

/// Default config location: `<config dir>/dragonfin/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dragonfin").join("config.toml"))
}

/// Load configuration from `path`, or defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<DragonfinConfig, ConfigError> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No config file, using defaults");
        return Ok(DragonfinConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Write a config as TOML, creating the parent directory if needed.
pub fn save_config(path: &Path, config: &DragonfinConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("dragonfin-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = scratch_path("does-not-exist.toml");
        let config = load_config(&path).unwrap();
        assert_eq!(config, DragonfinConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("saved.toml");
        let mut config = DragonfinConfig::default();
        config.engine.check_interval_ms = 250;
        config.overlay.european_number_format = true;

        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_parse_error_carries_path() {
        let path = scratch_path("broken.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[engine\ncheck_interval_ms = ").unwrap();

        match load_config(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }

        let _ = fs::remove_file(&path);
    }
}
