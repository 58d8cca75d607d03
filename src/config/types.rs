//! Configuration types for the Workforce Engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::DirectoryEntry;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on (e.g. "0.0.0.0:8080").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

/// Rules for classifying and closing attendance days.
///
/// # Example
///
/// ```
/// use workforce_engine::config::AttendancePolicy;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
///
/// let policy = AttendancePolicy::default();
/// assert_eq!(policy.late_cutoff, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
/// assert_eq!(policy.half_day_threshold_hours, Decimal::from(4));
/// assert_eq!(policy.standard_work_hours, Decimal::from(8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendancePolicy {
    /// Check-ins strictly after this local time are late.
    #[serde(default = "default_late_cutoff")]
    pub late_cutoff: NaiveTime,
    /// Closed days with fewer worked hours are half-days.
    #[serde(default = "default_half_day_threshold")]
    pub half_day_threshold_hours: Decimal,
    /// Worked hours beyond this count as overtime hours.
    #[serde(default = "default_standard_work_hours")]
    pub standard_work_hours: Decimal,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            late_cutoff: default_late_cutoff(),
            half_day_threshold_hours: default_half_day_threshold(),
            standard_work_hours: default_standard_work_hours(),
        }
    }
}

fn default_late_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_half_day_threshold() -> Decimal {
    Decimal::from(4)
}

fn default_standard_work_hours() -> Decimal {
    Decimal::from(8)
}

/// Employee directory client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    /// Upper bound on any single directory call, in milliseconds.
    #[serde(default = "default_directory_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_directory_timeout_ms(),
        }
    }
}

fn default_directory_timeout_ms() -> u64 {
    2000
}

/// Structure of `engine.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSettings {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Attendance rules.
    #[serde(default)]
    pub attendance: AttendancePolicy,
    /// Directory client settings.
    #[serde(default)]
    pub directory: DirectorySettings,
}

/// Structure of `roster.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterConfig {
    /// All employees known to the static directory.
    #[serde(default)]
    pub employees: Vec<DirectoryEntry>,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    settings: EngineSettings,
    roster: Vec<DirectoryEntry>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(settings: EngineSettings, roster: Vec<DirectoryEntry>) -> Self {
        Self { settings, roster }
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.settings.server
    }

    /// Returns the attendance policy.
    pub fn attendance(&self) -> &AttendancePolicy {
        &self.settings.attendance
    }

    /// Returns the directory client settings.
    pub fn directory(&self) -> &DirectorySettings {
        &self.settings.directory
    }

    /// Returns the static roster.
    pub fn roster(&self) -> &[DirectoryEntry] {
        &self.roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_engine_yaml_uses_defaults() {
        let settings: EngineSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(settings.attendance, AttendancePolicy::default());
        assert_eq!(settings.directory.timeout_ms, 2000);
    }

    #[test]
    fn test_attendance_overrides() {
        let yaml = r#"
attendance:
  late_cutoff: "08:30:00"
  half_day_threshold_hours: 3.5
"#;
        let settings: EngineSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            settings.attendance.late_cutoff,
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(settings.attendance.half_day_threshold_hours, Decimal::new(35, 1));
        assert_eq!(settings.attendance.standard_work_hours, Decimal::from(8));
    }
}
