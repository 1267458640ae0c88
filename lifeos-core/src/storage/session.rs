use std::collections::HashSet;

use chrono::{NaiveDate, TimeZone};

use crate::{
    error::StorageError,
    metrics::habits::{self, HabitProgress},
    model::{HabitRecord, NewHabit},
};

use super::HabitStore;

/// The working copy of habits for one session.
///
/// Holds records in storage order (newest first). Every mutation goes to the
/// store first; the local copy only changes once the store has accepted it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitSession {
    records: Vec<HabitRecord>,
}

impl HabitSession {
    /// Fetch the current list from storage.
    pub async fn load<S: HabitStore + ?Sized>(store: &S) -> Result<Self, StorageError> {
        Self::from_records(store.list().await?)
    }

    pub fn from_records(records: Vec<HabitRecord>) -> Result<Self, StorageError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(StorageError::DuplicateId(record.id));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[HabitRecord] {
        &self.records
    }

    pub fn get(&self, id: i64) -> Option<&HabitRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn progress<Tz: TimeZone>(&self, today: NaiveDate, tz: &Tz) -> HabitProgress {
        habits::compute_with_streak(&self.records, today, tz)
    }

    /// Create a habit in storage and put it at the top of the list.
    pub async fn add<S: HabitStore + ?Sized>(
        &mut self,
        store: &S,
        label: &str,
        completed: bool,
    ) -> Result<&HabitRecord, StorageError> {
        let created = store.create(NewHabit::new(label, completed)).await?;
        if self.get(created.id).is_some() {
            return Err(StorageError::DuplicateId(created.id));
        }

        self.records.insert(0, created);
        Ok(&self.records[0])
    }

    /// Flip the completed flag of a habit in storage, then locally.
    pub async fn toggle<S: HabitStore + ?Sized>(
        &mut self,
        store: &S,
        id: i64,
    ) -> Result<&HabitRecord, StorageError> {
        let completed = self.get(id).ok_or(StorageError::NotFound(id))?.completed;
        self.set_completed(store, id, !completed).await
    }

    pub async fn set_completed<S: HabitStore + ?Sized>(
        &mut self,
        store: &S,
        id: i64,
        completed: bool,
    ) -> Result<&HabitRecord, StorageError> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StorageError::NotFound(id))?;

        let updated = store.set_completed(id, completed).await?;
        self.records[idx] = updated;
        Ok(&self.records[idx])
    }
}
