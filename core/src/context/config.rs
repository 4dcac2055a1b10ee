//! Game configuration
//!
//! Re-exports the shared config type from simon-types and adds persistence.

use std::path::Path;

pub use simon_types::GameConfig;

use super::error::ConfigError;

/// confy application name
pub const PROGRAM_NAME: &str = "simon";
/// confy configuration name
pub const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// GameConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for GameConfig persistence
pub trait GameConfigExt: Sized {
    /// Load the stored config, falling back to defaults on any failure.
    fn load() -> Self;

    /// Load from an explicit file. A missing file is created with defaults.
    fn load_path(path: &Path) -> Result<Self, ConfigError>;

    fn save(&self) -> Result<(), ConfigError>;

    fn save_path(&self, path: &Path) -> Result<(), ConfigError>;
}

impl GameConfigExt for GameConfig {
    fn load() -> Self {
        match confy::load(PROGRAM_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config, using defaults");
                Self::default()
            }
        }
    }

    fn load_path(path: &Path) -> Result<Self, ConfigError> {
        confy::load_path(path).map_err(|source| ConfigError::LoadPath {
            path: path.to_path_buf(),
            source,
        })
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(PROGRAM_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn save_path(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("simon-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = scratch_path("fresh.toml");
        let _ = std::fs::remove_file(&path);

        let config = GameConfig::load_path(&path).unwrap();
        assert_eq!(config, GameConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn saved_overrides_are_loaded_back() {
        let path = scratch_path("custom.toml");
        let mut config = GameConfig::default();
        config.input.waste_of_time_ms = 5000;
        config.seed = Some(9);
        config.save_path(&path).unwrap();

        let loaded = GameConfig::load_path(&path).unwrap();
        assert_eq!(loaded.input.waste_of_time_ms, 5000);
        assert_eq!(loaded.seed, Some(9));
        assert_eq!(loaded.playback, config.playback);
    }
}
