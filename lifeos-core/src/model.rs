use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the `habit_item` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub id: i64,
    pub label: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of a create request; storage assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHabit {
    pub label: String,
    pub completed: bool,
}

impl NewHabit {
    pub fn new(label: impl Into<String>, completed: bool) -> Self {
        Self { label: label.into(), completed }
    }
}

/// Current conditions in imperial units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Degrees Fahrenheit.
    pub temperature: f64,
    pub description: String,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Miles per hour.
    pub wind_speed: f64,
}

/// Multi-day forecast in metric units, three-hour steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub entries: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: DateTime<Utc>,
    /// Degrees Celsius.
    pub temperature: f64,
    pub description: String,
    pub humidity: u8,
    /// Metres per second.
    pub wind_speed: f64,
}

/// A value that may not have arrived yet.
///
/// `Unknown` is distinct from zero or empty: it means the collaborator fetch
/// failed or has not resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Reading<T> {
    Known(T),
    Unknown,
}

impl<T> Reading<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Reading::Unknown)
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Reading::Known(v) => Some(v),
            Reading::Unknown => None,
        }
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Reading::Unknown, Reading::Known)
    }
}

impl<T: fmt::Display> fmt::Display for Reading<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Known(v) => v.fmt(f),
            Reading::Unknown => f.write_str("--"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_from_option() {
        assert_eq!(Reading::from(Some(3)), Reading::Known(3));
        assert!(Reading::<i32>::from(None).is_unknown());
    }

    #[test]
    fn unknown_renders_placeholder() {
        assert_eq!(Reading::<f64>::Unknown.to_string(), "--");
        assert_eq!(Reading::Known(72).to_string(), "72");
    }

    #[test]
    fn habit_record_parses_storage_row() {
        let row = r#"{"id":7,"label":"Read 20 Pages","completed":true,"created_at":"2025-12-31T08:15:00+00:00"}"#;
        let habit: HabitRecord = serde_json::from_str(row).expect("row should parse");
        assert_eq!(habit.id, 7);
        assert!(habit.completed);
        assert_eq!(habit.label, "Read 20 Pages");
    }
}
