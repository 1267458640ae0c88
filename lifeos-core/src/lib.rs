//! Core library for the `lifeos` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Pure dashboard derivations (date figures, habit progress, weather icons)
//! - The view-model assembler that composes them
//! - Clients for the weather API and the hosted habit table
//!
//! It is used by `lifeos-cli`, but can also be reused by other front ends.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod latest;
pub mod metrics;
pub mod model;
pub mod provider;
pub mod storage;

#[cfg(test)]
mod test_http;

pub use config::{Config, StorageConfig, WeatherConfig};
pub use dashboard::{DashboardProfile, DashboardViewModel, ScheduleItem, WeatherPanel, assemble};
pub use error::{InvalidDateError, StorageError, WeatherFetchError};
pub use model::{Forecast, ForecastEntry, HabitRecord, NewHabit, Reading, WeatherSnapshot};
pub use provider::{WeatherFeed, WeatherProvider};
pub use storage::{HabitSession, HabitStore};
