//! Employee directory models and the acting user.
//!
//! Employees are owned by an external directory service; this crate only
//! reads their display attributes and, for payroll, their base salary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display attributes of an employee, as returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Work email address.
    pub email: String,
    /// Human-facing employee number (e.g. "EMP-0001").
    pub employee_id: String,
    /// Department name.
    pub department: String,
    /// Job position.
    pub position: String,
}

impl EmployeeProfile {
    /// Returns "first last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An employee as stored in a static directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Directory identifier, used as the employee reference in records.
    pub id: String,
    /// Display attributes.
    #[serde(flatten)]
    pub profile: EmployeeProfile,
    /// Current monthly base salary.
    pub base_salary: Decimal,
    /// Whether the employee is on the active roster.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// An active employee as seen by the payroll batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Directory identifier.
    pub employee_id: String,
    /// Current monthly base salary.
    pub base_salary: Decimal,
}

/// An employee reference after enrichment.
///
/// Serialises as the profile plus `id` when resolved, or just `{ "id": ..., "resolved": false }`
/// when the directory could not supply it.
///
/// # Example
///
/// ```
/// use workforce_engine::models::EmployeeRef;
///
/// let unresolved = EmployeeRef::Unresolved { id: "emp_404".to_string(), resolved: false };
/// assert_eq!(unresolved.id(), "emp_404");
/// assert!(!unresolved.is_resolved());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployeeRef {
    /// The directory returned display attributes.
    Resolved {
        /// Directory identifier.
        id: String,
        /// Display attributes.
        #[serde(flatten)]
        profile: EmployeeProfile,
    },
    /// The directory was unavailable or did not know the id.
    Unresolved {
        /// Directory identifier.
        id: String,
        /// Always false; lets clients tell the two shapes apart.
        resolved: bool,
    },
}

impl EmployeeRef {
    /// Creates an unresolved reference.
    pub fn unresolved(id: impl Into<String>) -> Self {
        Self::Unresolved {
            id: id.into(),
            resolved: false,
        }
    }

    /// The directory identifier.
    pub fn id(&self) -> &str {
        match self {
            Self::Resolved { id, .. } | Self::Unresolved { id, .. } => id,
        }
    }

    /// Returns true if display attributes are present.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Role of the user performing an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular employee.
    #[default]
    Employee,
    /// Line manager.
    Manager,
    /// HR staff.
    Hr,
    /// Administrator.
    Admin,
}

impl Role {
    /// HR staff and administrators may back-fill and adjust decided records.
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Hr | Role::Admin)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            "hr" => Ok(Role::Hr),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// The user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User identifier, if known.
    pub id: Option<String>,
    /// User role.
    pub role: Role,
}

impl Actor {
    /// Creates an actor.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: Some(id.into()),
            role,
        }
    }

    /// An actor with no identity and the least-privileged role.
    pub fn anonymous() -> Self {
        Self {
            id: None,
            role: Role::Employee,
        }
    }

    /// Identifier for audit stamps, "unknown" when absent.
    pub fn label(&self) -> String {
        self.id.clone().unwrap_or_else(|| "unknown".to_string())
    }
}
