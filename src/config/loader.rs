//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::DirectoryEntry;

use super::types::{EngineConfig, EngineSettings, RosterConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml   # Server, attendance and directory settings (required)
/// └── roster.yaml   # Static employee directory (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use workforce_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Late after {}", loader.config().attendance().late_cutoff);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing
    /// - Any file contains invalid YAML
    /// - Any value is out of range (non-positive hours or timeout, duplicate roster ids)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let settings = Self::load_yaml::<EngineSettings>(&engine_path)?;
        Self::validate_settings(&settings, &engine_path)?;

        let roster_path = path.join("roster.yaml");
        let roster = if roster_path.exists() {
            Self::load_yaml::<RosterConfig>(&roster_path)?.employees
        } else {
            Vec::new()
        };
        Self::validate_roster(&roster, &roster_path)?;

        Ok(Self {
            config: EngineConfig::new(settings, roster),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_settings(settings: &EngineSettings, path: &Path) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        let attendance = &settings.attendance;
        if attendance.half_day_threshold_hours < Decimal::ZERO {
            return Err(invalid("attendance.half_day_threshold_hours must not be negative"));
        }
        if attendance.standard_work_hours <= Decimal::ZERO {
            return Err(invalid("attendance.standard_work_hours must be positive"));
        }
        if settings.directory.timeout_ms == 0 {
            return Err(invalid("directory.timeout_ms must be positive"));
        }
        Ok(())
    }

    fn validate_roster(roster: &[DirectoryEntry], path: &Path) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for entry in roster {
            if !seen.insert(entry.id.as_str()) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("duplicate employee id '{}'", entry.id),
                });
            }
            if entry.base_salary < Decimal::ZERO {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("employee '{}' has a negative base_salary", entry.id),
                });
            }
        }
        Ok(())
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use std::path::PathBuf;

    const CONFIG_PATH: &str = "./config/default";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("workforce-engine-{}-{}", name, uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_bundled_config() {
        let loader = ConfigLoader::load(CONFIG_PATH).expect("Failed to load config");
        let config = loader.config();

        assert_eq!(
            config.attendance().late_cutoff,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(config.attendance().half_day_threshold_hours, Decimal::from(4));
        assert!(!config.roster().is_empty());
    }

    #[test]
    fn test_missing_directory_is_config_not_found() {
        match ConfigLoader::load("./config/does-not-exist") {
            Err(EngineError::ConfigNotFound { path }) => assert!(path.ends_with("engine.yaml")),
            other => panic!("expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_roster_is_optional() {
        let dir = scratch_dir("no-roster");
        fs::write(dir.join("engine.yaml"), "server:\n  bind_addr: \"0.0.0.0:9000\"\n").unwrap();

        let loader = ConfigLoader::load(&dir).unwrap();
        assert_eq!(loader.config().server().bind_addr, "0.0.0.0:9000");
        assert!(loader.config().roster().is_empty());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = scratch_dir("bad-yaml");
        fs::write(dir.join("engine.yaml"), "attendance: [unclosed").unwrap();

        assert!(matches!(
            ConfigLoader::load(&dir),
            Err(EngineError::ConfigParseError { .. })
        ));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_zero_standard_hours_is_rejected() {
        let dir = scratch_dir("zero-hours");
        fs::write(
            dir.join("engine.yaml"),
            "attendance:\n  standard_work_hours: 0\n",
        )
        .unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("standard_work_hours"))
            }
            other => panic!("expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_duplicate_roster_ids_are_rejected() {
        let dir = scratch_dir("dup-roster");
        fs::write(dir.join("engine.yaml"), "{}\n").unwrap();
        let entry = "  - id: emp_001\n    first_name: A\n    last_name: B\n    email: a@b.c\n    employee_id: E1\n    department: D\n    position: P\n    base_salary: 100\n";
        fs::write(dir.join("roster.yaml"), format!("employees:\n{}{}", entry, entry)).unwrap();

        match ConfigLoader::load(&dir) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("duplicate employee id"))
            }
            other => panic!("expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).ok();
    }
}
