//! In-memory [`RecordStore`] with indexed uniqueness constraints.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AttendanceRecord, CompensationRecord, LeaveRequest, PerformanceReview, Period};

use super::{RecordStore, StoreError, StoreResult};

/// A record that can live in a [`Table`].
trait Keyed: Clone {
    type Key: Hash + Eq + Clone + Debug;

    fn id(&self) -> Uuid;

    /// The value that must be unique across the table, if any.
    fn unique_key(&self) -> Option<Self::Key>;
}

impl Keyed for CompensationRecord {
    type Key = (String, Period);

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<Self::Key> {
        Some(self.period_key())
    }
}

impl Keyed for AttendanceRecord {
    type Key = (String, NaiveDate);

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<Self::Key> {
        Some(self.day_key())
    }
}

impl Keyed for PerformanceReview {
    type Key = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<Self::Key> {
        None
    }
}

impl Keyed for LeaveRequest {
    type Key = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<Self::Key> {
        None
    }
}

/// Rows by id plus a unique index.
struct Table<R: Keyed> {
    rows: HashMap<Uuid, R>,
    index: HashMap<R::Key, Uuid>,
}

impl<R: Keyed> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: Keyed> Table<R> {
    fn insert(&mut self, row: R) -> StoreResult<R> {
        let id = row.id();
        if self.rows.contains_key(&id) {
            return Err(StoreError::Duplicate {
                key: id.to_string(),
            });
        }
        if let Some(key) = row.unique_key() {
            if self.index.contains_key(&key) {
                return Err(StoreError::Duplicate {
                    key: format!("{:?}", key),
                });
            }
            self.index.insert(key, id);
        }
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    fn update(&mut self, row: R) -> StoreResult<R> {
        let id = row.id();
        let previous_key = self
            .rows
            .get(&id)
            .ok_or(StoreError::Missing { id })?
            .unique_key();
        let next_key = row.unique_key();

        if previous_key != next_key {
            if let Some(key) = &next_key {
                if self.index.get(key).is_some_and(|owner| *owner != id) {
                    return Err(StoreError::Duplicate {
                        key: format!("{:?}", key),
                    });
                }
            }
            if let Some(key) = previous_key {
                self.index.remove(&key);
            }
            if let Some(key) = next_key {
                self.index.insert(key, id);
            }
        }

        self.rows.insert(id, row.clone());
        Ok(row)
    }

    fn get(&self, id: Uuid) -> Option<R> {
        self.rows.get(&id).cloned()
    }

    fn find(&self, key: &R::Key) -> Option<R> {
        self.index.get(key).and_then(|id| self.rows.get(id)).cloned()
    }
}

#[derive(Default)]
struct Tables {
    compensation: Table<CompensationRecord>,
    attendance: Table<AttendanceRecord>,
    reviews: Table<PerformanceReview>,
    leave: Table<LeaveRequest>,
}

/// A process-local store; the default backing for the server binary.
///
/// All tables sit behind one lock, so each insert checks and claims its
/// unique key atomically.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_compensation(&self, record: CompensationRecord) -> StoreResult<CompensationRecord> {
        self.tables.write().await.compensation.insert(record)
    }

    async fn update_compensation(&self, record: CompensationRecord) -> StoreResult<CompensationRecord> {
        self.tables.write().await.compensation.update(record)
    }

    async fn get_compensation(&self, id: Uuid) -> StoreResult<Option<CompensationRecord>> {
        Ok(self.tables.read().await.compensation.get(id))
    }

    async fn find_compensation(
        &self,
        employee_id: &str,
        period: Period,
    ) -> StoreResult<Option<CompensationRecord>> {
        let key = (employee_id.to_string(), period);
        Ok(self.tables.read().await.compensation.find(&key))
    }

    async fn insert_attendance(&self, record: AttendanceRecord) -> StoreResult<AttendanceRecord> {
        self.tables.write().await.attendance.insert(record)
    }

    async fn update_attendance(&self, record: AttendanceRecord) -> StoreResult<AttendanceRecord> {
        self.tables.write().await.attendance.update(record)
    }

    async fn get_attendance(&self, id: Uuid) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self.tables.read().await.attendance.get(id))
    }

    async fn find_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let key = (employee_id.to_string(), date);
        Ok(self.tables.read().await.attendance.find(&key))
    }

    async fn insert_review(&self, review: PerformanceReview) -> StoreResult<PerformanceReview> {
        self.tables.write().await.reviews.insert(review)
    }

    async fn update_review(&self, review: PerformanceReview) -> StoreResult<PerformanceReview> {
        self.tables.write().await.reviews.update(review)
    }

    async fn get_review(&self, id: Uuid) -> StoreResult<Option<PerformanceReview>> {
        Ok(self.tables.read().await.reviews.get(id))
    }

    async fn insert_leave(&self, request: LeaveRequest) -> StoreResult<LeaveRequest> {
        self.tables.write().await.leave.insert(request)
    }

    async fn update_leave(&self, request: LeaveRequest) -> StoreResult<LeaveRequest> {
        self.tables.write().await.leave.update(request)
    }

    async fn get_leave(&self, id: Uuid) -> StoreResult<Option<LeaveRequest>> {
        Ok(self.tables.read().await.leave.get(id))
    }
}
