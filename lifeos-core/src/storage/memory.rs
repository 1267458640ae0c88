//! In-process [`HabitStore`] for tests.

use std::sync::{
    Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::{
    error::StorageError,
    model::{HabitRecord, NewHabit},
};

use super::HabitStore;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<HabitRecord>,
    next_id: i64,
    last_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct MemoryHabitStore {
    table: Mutex<Table>,
    failing: AtomicBool,
}

impl MemoryHabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<HabitRecord>) -> Self {
        let next_id = rows.iter().map(|r| r.id).max().unwrap_or(0);
        let last_created = rows.iter().map(|r| r.created_at).max();
        Self {
            table: Mutex::new(Table { rows, next_id, last_created }),
            failing: AtomicBool::new(false),
        }
    }

    /// While set, every call fails with a 503.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.table().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Status { status: 503, message: "unavailable".to_string() });
        }
        Ok(())
    }
}

#[async_trait]
impl HabitStore for MemoryHabitStore {
    async fn list(&self) -> Result<Vec<HabitRecord>, StorageError> {
        self.check()?;
        let mut rows = self.table().rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create(&self, habit: NewHabit) -> Result<HabitRecord, StorageError> {
        self.check()?;
        let mut table = self.table();

        // Keep created_at strictly increasing so ordering is deterministic.
        let now = Utc::now();
        let created_at = match table.last_created {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };

        table.next_id += 1;
        let record = HabitRecord {
            id: table.next_id,
            label: habit.label,
            completed: habit.completed,
            created_at,
        };
        table.last_created = Some(created_at);
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn set_completed(&self, id: i64, completed: bool) -> Result<HabitRecord, StorageError> {
        self.check()?;
        let mut table = self.table();
        let row = table
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StorageError::NotFound(id))?;
        row.completed = completed;
        Ok(row.clone())
    }
}
