use thiserror::Error;

use crate::analytics::AnalyticsError;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid trade: {0}")]
    ValidationError(String),

    #[error("Trade not found: {0}")]
    NotFound(String),

    #[error("Failed to parse data: {0}")]
    ParseError(String),

    #[error("Invalid settings: {0}")]
    SettingsError(String),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

pub type Result<T> = std::result::Result<T, JournalError>;

impl From<rusqlite::Error> for JournalError {
    fn from(err: rusqlite::Error) -> Self {
        JournalError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::ParseError(err.to_string())
    }
}

impl From<csv::Error> for JournalError {
    fn from(err: csv::Error) -> Self {
        JournalError::ParseError(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for JournalError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        JournalError::DatabaseError(format!("Connection lock poisoned: {}", err))
    }
}
