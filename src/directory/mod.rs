//! Employee directory collaborator.
//!
//! Employees are owned by a separate directory service. This crate reads
//! from it in two places only:
//!
//! - the payroll batch fetches the active roster with base salaries
//! - read endpoints enrich records with display attributes
//!
//! Enrichment never fails a request: when the directory is down or slow the
//! record is returned with an [`EmployeeRef::Unresolved`] reference. The
//! payroll batch cannot run without a roster and reports the failure.

mod static_directory;
mod timeout;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

use crate::error::EngineError;
use crate::models::{EmployeeProfile, EmployeeRef, RosterEntry};

pub use static_directory::StaticDirectory;
pub use timeout::TimeoutDirectory;

/// Errors reported by an [`EmployeeDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The directory could not be reached or returned an error.
    #[error("directory unavailable: {message}")]
    Unavailable {
        /// A description of the failure.
        message: String,
    },

    /// The call did not complete within the configured timeout.
    #[error("directory call timed out after {after_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        after_ms: u64,
    },
}

impl From<DirectoryError> for EngineError {
    fn from(error: DirectoryError) -> Self {
        EngineError::DirectoryUnavailable {
            message: error.to_string(),
        }
    }
}

/// Read-only access to employee records owned by another service.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Looks up display attributes for many employees at once.
    ///
    /// Unknown ids are simply absent from the returned map.
    async fn batch_lookup(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, EmployeeProfile>, DirectoryError>;

    /// Lists currently active employees with their base salary.
    async fn active_roster(&self) -> Result<Vec<RosterEntry>, DirectoryError>;
}

/// Resolves many employee ids, degrading to unresolved references.
///
/// Every requested id appears in the returned map.
pub async fn resolve_employees(
    directory: &dyn EmployeeDirectory,
    ids: &[String],
) -> HashMap<String, EmployeeRef> {
    let mut unique: Vec<String> = ids.to_vec();
    unique.sort();
    unique.dedup();

    let mut profiles = match directory.batch_lookup(&unique).await {
        Ok(profiles) => profiles,
        Err(err) => {
            warn!(error = %err, ids = unique.len(), "Directory lookup failed, returning unresolved references");
            HashMap::new()
        }
    };

    unique
        .into_iter()
        .map(|id| {
            let reference = match profiles.remove(&id) {
                Some(profile) => EmployeeRef::Resolved {
                    id: id.clone(),
                    profile,
                },
                None => EmployeeRef::unresolved(id.clone()),
            };
            (id, reference)
        })
        .collect()
}

/// Resolves a single employee id, degrading to an unresolved reference.
pub async fn resolve_employee(directory: &dyn EmployeeDirectory, id: &str) -> EmployeeRef {
    let ids = [id.to_string()];
    resolve_employees(directory, &ids)
        .await
        .remove(id)
        .unwrap_or_else(|| EmployeeRef::unresolved(id))
}
