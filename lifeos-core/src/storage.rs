use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::StorageError,
    model::{HabitRecord, NewHabit},
};

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod rest;
pub mod session;

pub use rest::RestHabitStore;
pub use session::HabitSession;

/// The hosted table that owns habit records.
#[async_trait]
pub trait HabitStore: Send + Sync + Debug {
    /// All habits, newest `created_at` first.
    async fn list(&self) -> Result<Vec<HabitRecord>, StorageError>;

    /// Insert a habit; storage assigns `id` and `created_at`.
    async fn create(&self, habit: NewHabit) -> Result<HabitRecord, StorageError>;

    /// Update the completed flag of an existing habit.
    async fn set_completed(&self, id: i64, completed: bool) -> Result<HabitRecord, StorageError>;
}

#[async_trait]
impl<T: HabitStore + ?Sized> HabitStore for Box<T> {
    async fn list(&self) -> Result<Vec<HabitRecord>, StorageError> {
        (**self).list().await
    }

    async fn create(&self, habit: NewHabit) -> Result<HabitRecord, StorageError> {
        (**self).create(habit).await
    }

    async fn set_completed(&self, id: i64, completed: bool) -> Result<HabitRecord, StorageError> {
        (**self).set_completed(id, completed).await
    }
}

/// Construct the habit store client from config.
pub fn store_from_config(config: &Config) -> anyhow::Result<RestHabitStore> {
    let storage = config.storage_config()?;
    Ok(RestHabitStore::new(&storage.url, storage.api_key.clone()))
}
