use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::calendar::Calendar;
use super::error::AnalyticsError;
use crate::models::Trade;

/// Calendar window relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Daily,
    Weekly,
    Monthly,
    #[default]
    All,
}

impl FromStr for TimeFrame {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(TimeFrame::Daily),
            "weekly" => Ok(TimeFrame::Weekly),
            "monthly" => Ok(TimeFrame::Monthly),
            "all" => Ok(TimeFrame::All),
            other => Err(AnalyticsError::InvalidSelector {
                kind: "time frame",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeFilter {
    #[default]
    All,
    Winners,
    Losers,
}

impl FromStr for OutcomeFilter {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(OutcomeFilter::All),
            "winners" => Ok(OutcomeFilter::Winners),
            "losers" => Ok(OutcomeFilter::Losers),
            other => Err(AnalyticsError::InvalidSelector {
                kind: "outcome filter",
                value: other.to_string(),
            }),
        }
    }
}

/// Keep the trades that fall in the same calendar day, week or month as `now`
pub fn filter_by_time_frame(
    trades: &[Trade],
    frame: TimeFrame,
    now: DateTime<Utc>,
    calendar: &Calendar,
) -> Vec<Trade> {
    let keep = |trade: &Trade| match frame {
        TimeFrame::Daily => calendar.same_day(trade.created_at, now),
        TimeFrame::Weekly => calendar.same_week(trade.created_at, now),
        TimeFrame::Monthly => calendar.same_month(trade.created_at, now),
        TimeFrame::All => true,
    };

    trades.iter().filter(|t| keep(t)).cloned().collect()
}

/// Keep winners or losers; break-even trades belong to neither
pub fn filter_by_outcome(trades: &[Trade], mode: OutcomeFilter) -> Vec<Trade> {
    trades
        .iter()
        .filter(|t| match mode {
            OutcomeFilter::All => true,
            OutcomeFilter::Winners => t.is_winner(),
            OutcomeFilter::Losers => t.is_loser(),
        })
        .cloned()
        .collect()
}
