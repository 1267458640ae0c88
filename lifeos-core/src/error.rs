use thiserror::Error;

/// Failure talking to the hosted habit table.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Network error talking to habit storage: {0}")]
    Network(String),

    #[error("Habit storage request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse habit storage response: {0}")]
    Parse(String),

    #[error("Habit {0} not found")]
    NotFound(i64),

    #[error("Habit storage returned duplicate id {0}")]
    DuplicateId(i64),
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Parse(err.to_string())
    }
}

/// Failure fetching weather from the upstream API.
#[derive(Debug, Error)]
pub enum WeatherFetchError {
    #[error("Network error talking to weather API: {0}")]
    Network(String),

    #[error("Weather request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse weather response: {0}")]
    Parse(String),

    #[error("Forecast days must be between 1 and {max}, got {requested}")]
    ForecastRange { requested: u8, max: u8 },
}

impl From<reqwest::Error> for WeatherFetchError {
    fn from(err: reqwest::Error) -> Self {
        WeatherFetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for WeatherFetchError {
    fn from(err: serde_json::Error) -> Self {
        WeatherFetchError::Parse(err.to_string())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid date '{input}': expected YYYY-MM-DD")]
pub struct InvalidDateError {
    pub input: String,
}

/// Trim an upstream error body so it fits in a single log/error line.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("nope"), "nope");
    }

    #[test]
    fn truncate_body_cuts_long_bodies_on_char_boundary() {
        let body = "é".repeat(300);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }

    #[test]
    fn status_error_mentions_code() {
        let err = WeatherFetchError::Status { status: 401, message: "bad key".into() };
        assert!(err.to_string().contains("401"));
    }
}
