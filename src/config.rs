// Global configuration for the model assembler
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// Global configuration for physics data and scratch locations
pub static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::new()));

/// Process-wide settings shared by every assembler.
///
/// `physics_data` points at the JSON file holding energy group structures and
/// dose coefficients (see [`crate::physics_data::PhysicsData`]). `scratch_dir`
/// is the parent directory under which bounding-box probes create their
/// disposable working directories; when unset the system temp dir is used.
///
/// Most code should obtain a guard with [`Config::global`] rather than
/// locking [`CONFIG`] directly.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Path to the physics data JSON file.
    pub physics_data: Option<PathBuf>,
    /// Parent directory for engine probe scratch directories.
    pub scratch_dir: Option<PathBuf>,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Config {
            physics_data: None,
            scratch_dir: None,
        }
    }

    /// Set the physics data file used by [`crate::physics_data::PhysicsData::from_config`]
    pub fn set_physics_data(&mut self, path: impl AsRef<Path>) {
        self.physics_data = Some(path.as_ref().to_path_buf());
    }

    /// Set the parent directory for probe scratch directories
    pub fn set_scratch_dir(&mut self, path: impl AsRef<Path>) {
        self.scratch_dir = Some(path.as_ref().to_path_buf());
    }

    /// Clear all settings
    pub fn clear(&mut self) {
        self.physics_data = None;
        self.scratch_dir = None;
    }

    /// Get the global configuration instance
    pub fn global() -> std::sync::MutexGuard<'static, Self> {
        CONFIG
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_is_empty() {
        let config = Config::new();
        assert!(config.physics_data.is_none());
        assert!(config.scratch_dir.is_none());
    }

    #[test]
    fn test_set_and_clear() {
        let mut config = Config::new();
        config.set_physics_data("data/physics.json");
        config.set_scratch_dir("/tmp/probes");
        assert_eq!(
            config.physics_data,
            Some(PathBuf::from("data/physics.json"))
        );
        assert_eq!(config.scratch_dir, Some(PathBuf::from("/tmp/probes")));

        config.clear();
        assert!(config.physics_data.is_none());
        assert!(config.scratch_dir.is_none());
    }
}
