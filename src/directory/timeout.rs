//! Timeout wrapper for directory calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::timeout;

use crate::models::{EmployeeProfile, RosterEntry};

use super::{DirectoryError, EmployeeDirectory};

/// Bounds every call to the inner directory by a fixed timeout.
#[derive(Debug, Clone)]
pub struct TimeoutDirectory<D> {
    inner: D,
    limit: Duration,
}

impl<D: EmployeeDirectory> TimeoutDirectory<D> {
    /// Wraps `inner`, failing any call that takes longer than `limit`.
    pub fn new(inner: D, limit: Duration) -> Self {
        Self { inner, limit }
    }

    fn elapsed(&self) -> DirectoryError {
        DirectoryError::Timeout {
            after_ms: u64::try_from(self.limit.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[async_trait]
impl<D: EmployeeDirectory> EmployeeDirectory for TimeoutDirectory<D> {
    async fn batch_lookup(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, EmployeeProfile>, DirectoryError> {
        timeout(self.limit, self.inner.batch_lookup(ids))
            .await
            .map_err(|_| self.elapsed())?
    }

    async fn active_roster(&self) -> Result<Vec<RosterEntry>, DirectoryError> {
        timeout(self.limit, self.inner.active_roster())
            .await
            .map_err(|_| self.elapsed())?
    }
}
