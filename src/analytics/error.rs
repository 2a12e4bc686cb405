use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Trade {id} has a non-finite {field}: {value}")]
    InvalidTrade {
        id: String,
        field: &'static str,
        value: f64,
    },

    #[error("Trade {id} has an out-of-range timestamp: {created_at}")]
    InvalidTimestamp { id: String, created_at: DateTime<Utc> },

    #[error("No trades available")]
    NoData,

    #[error("Unknown {kind}: '{value}'")]
    InvalidSelector { kind: &'static str, value: String },

    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
}
