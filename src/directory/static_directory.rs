//! Directory backed by a fixed list of employees, usually from `roster.yaml`.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::models::{DirectoryEntry, EmployeeProfile, RosterEntry};

use super::{DirectoryError, EmployeeDirectory};

/// An in-process directory.
///
/// The roster is returned in the order entries were given.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    entries: Vec<DirectoryEntry>,
    by_id: HashMap<String, usize>,
}

impl StaticDirectory {
    /// Creates a directory from entries.
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        let by_id = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.id.clone(), index))
            .collect();
        Self { entries, by_id }
    }
}

#[async_trait]
impl EmployeeDirectory for StaticDirectory {
    async fn batch_lookup(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, EmployeeProfile>, DirectoryError> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.by_id
                    .get(id)
                    .map(|index| (id.clone(), self.entries[*index].profile.clone()))
            })
            .collect())
    }

    async fn active_roster(&self) -> Result<Vec<RosterEntry>, DirectoryError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| RosterEntry {
                employee_id: entry.id.clone(),
                base_salary: entry.base_salary,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn entry(id: &str, active: bool) -> DirectoryEntry {
        DirectoryEntry {
            id: id.to_string(),
            profile: EmployeeProfile {
                first_name: id.to_string(),
                last_name: "Test".to_string(),
                email: format!("{}@example.com", id),
                employee_id: id.to_uppercase(),
                department: "Ops".to_string(),
                position: "Clerk".to_string(),
            },
            base_salary: Decimal::from(3000),
            active,
        }
    }

    #[tokio::test]
    async fn test_roster_excludes_inactive_employees() {
        let directory = StaticDirectory::new(vec![
            entry("emp_001", true),
            entry("emp_002", false),
            entry("emp_003", true),
        ]);

        let roster = directory.active_roster().await.unwrap();
        let ids: Vec<&str> = roster.iter().map(|r| r.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["emp_001", "emp_003"]);
    }

    #[tokio::test]
    async fn test_batch_lookup_includes_inactive_employees() {
        let directory = StaticDirectory::new(vec![entry("emp_002", false)]);
        let profiles = directory
            .batch_lookup(&["emp_002".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles["emp_002"].email, "emp_002@example.com");
    }
}
