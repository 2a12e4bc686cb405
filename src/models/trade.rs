use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Calendar years a trade timestamp may fall in
pub const TRADE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Whether `at` can be shifted into any reference offset and laid out on a calendar
pub fn timestamp_in_range(at: DateTime<Utc>) -> bool {
    TRADE_YEARS.contains(&at.year())
}

/// Image attached to a trade. Display-only, never aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screenshot {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(alias = "_id")]
    pub id: String,
    pub ticker: String,
    pub entry: f64,
    pub exit: f64,
    /// When the trade happened (not when it was stored)
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<Screenshot>,
}

impl Trade {
    pub fn profit_loss(&self) -> f64 {
        self.exit - self.entry
    }

    pub fn is_winner(&self) -> bool {
        self.profit_loss() > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.profit_loss() < 0.0
    }
}

/// Trade draft as submitted by the user or read from an import file.
///
/// `id` is only honoured by imports; `create_trade` always assigns a fresh one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTradeInput {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub ticker: String,
    pub entry: f64,
    pub exit: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub screenshots: Vec<Screenshot>,
}

impl CreateTradeInput {
    pub fn new(ticker: impl Into<String>, entry: f64, exit: f64) -> Self {
        Self {
            id: None,
            ticker: ticker.into(),
            entry,
            exit,
            created_at: None,
            strategy: None,
            comments: None,
            screenshots: Vec::new(),
        }
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Check the draft before it reaches the store
    pub fn validate(&self) -> Result<(), String> {
        if self.ticker.trim().is_empty() {
            return Err("ticker must not be empty".to_string());
        }
        if !self.entry.is_finite() {
            return Err(format!("entry price for {} is not a finite number", self.ticker));
        }
        if !self.exit.is_finite() {
            return Err(format!("exit price for {} is not a finite number", self.ticker));
        }
        if !(self.exit - self.entry).is_finite() {
            return Err(format!("profit/loss for {} is not a finite number", self.ticker));
        }
        if let Some(at) = self.created_at {
            if !timestamp_in_range(at) {
                return Err(format!("timestamp {} for {} is out of range", at.to_rfc3339(), self.ticker));
            }
        }
        Ok(())
    }

    pub fn into_trade(self, id: String, now: DateTime<Utc>) -> Trade {
        Trade {
            id,
            ticker: self.ticker.trim().to_string(),
            entry: self.entry,
            exit: self.exit,
            created_at: self.created_at.unwrap_or(now),
            strategy: self.strategy.filter(|s| !s.is_empty()),
            comments: self.comments.filter(|c| !c.is_empty()),
            screenshots: self.screenshots,
        }
    }
}
