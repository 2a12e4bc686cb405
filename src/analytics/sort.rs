use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use super::error::AnalyticsError;
use crate::models::Trade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Ticker,
    Entry,
    Exit,
    #[default]
    Date,
    ProfitLoss,
}

impl FromStr for SortKey {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ticker" => Ok(SortKey::Ticker),
            "entry" => Ok(SortKey::Entry),
            "exit" => Ok(SortKey::Exit),
            "date" => Ok(SortKey::Date),
            "profitLoss" => Ok(SortKey::ProfitLoss),
            other => Err(AnalyticsError::InvalidSelector {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(AnalyticsError::InvalidSelector {
                kind: "sort direction",
                value: other.to_string(),
            }),
        }
    }
}

/// Case-insensitive ordering with lowercase ahead of uppercase on otherwise
/// equal strings, close to a default locale collator.
fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded.then_with(|| {
        a.chars()
            .map(char::is_uppercase)
            .cmp(b.chars().map(char::is_uppercase))
    })
}

fn compare(a: &Trade, b: &Trade, key: SortKey) -> Ordering {
    match key {
        SortKey::Ticker => collate(&a.ticker, &b.ticker),
        SortKey::Entry => a.entry.total_cmp(&b.entry),
        SortKey::Exit => a.exit.total_cmp(&b.exit),
        SortKey::Date => a.created_at.cmp(&b.created_at),
        SortKey::ProfitLoss => a.profit_loss().total_cmp(&b.profit_loss()),
    }
}

/// Stable sort into a new collection; ties keep their input order in both directions
pub fn sort_trades(trades: &[Trade], key: SortKey, direction: SortDirection) -> Vec<Trade> {
    let mut sorted = trades.to_vec();
    match direction {
        SortDirection::Asc => sorted.sort_by(|a, b| compare(a, b, key)),
        SortDirection::Desc => sorted.sort_by(|a, b| compare(b, a, key)),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{trade_at, trade_on};
    use chrono::{TimeZone, Utc};

    fn tickers(trades: &[Trade]) -> Vec<&str> {
        trades.iter().map(|t| t.ticker.as_str()).collect()
    }

    fn ids(trades: &[Trade]) -> Vec<&str> {
        trades.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_ticker() {
        let at = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        let trades = vec![trade_at("1", "B", 1.0, 1.0, at), trade_at("2", "A", 1.0, 1.0, at)];

        let asc = sort_trades(&trades, SortKey::Ticker, SortDirection::Asc);
        assert_eq!(tickers(&asc), vec!["A", "B"]);

        let desc = sort_trades(&trades, SortKey::Ticker, SortDirection::Desc);
        assert_eq!(tickers(&desc), vec!["B", "A"]);
        // Input untouched
        assert_eq!(tickers(&trades), vec!["B", "A"]);
    }

    #[test]
    fn test_ticker_collation_ignores_case_first() {
        let at = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        let trades = vec![
            trade_at("1", "msft", 1.0, 1.0, at),
            trade_at("2", "AAPL", 1.0, 1.0, at),
            trade_at("3", "Amd", 1.0, 1.0, at),
            trade_at("4", "aapl", 1.0, 1.0, at),
        ];

        let asc = sort_trades(&trades, SortKey::Ticker, SortDirection::Asc);
        assert_eq!(tickers(&asc), vec!["aapl", "AAPL", "Amd", "msft"]);
    }

    #[test]
    fn test_numeric_keys() {
        let trades = vec![
            trade_on("a", 10.0, 30.0, 2025, 3, 3),
            trade_on("b", 5.0, 4.0, 2025, 3, 4),
            trade_on("c", 20.0, 21.0, 2025, 3, 5),
        ];

        assert_eq!(ids(&sort_trades(&trades, SortKey::Entry, SortDirection::Asc)), vec!["b", "a", "c"]);
        assert_eq!(ids(&sort_trades(&trades, SortKey::Exit, SortDirection::Desc)), vec!["a", "c", "b"]);
        assert_eq!(ids(&sort_trades(&trades, SortKey::ProfitLoss, SortDirection::Desc)), vec!["a", "c", "b"]);
        assert_eq!(ids(&sort_trades(&trades, SortKey::Date, SortDirection::Desc)), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_stable_on_ties() {
        let at = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        let trades = vec![
            trade_at("first", "X", 1.0, 2.0, at),
            trade_at("other", "Y", 1.0, 5.0, at + chrono::Duration::hours(1)),
            trade_at("second", "Z", 3.0, 4.0, at),
        ];

        let asc = sort_trades(&trades, SortKey::Date, SortDirection::Asc);
        assert_eq!(ids(&asc), vec!["first", "second", "other"]);

        let desc = sort_trades(&trades, SortKey::Date, SortDirection::Desc);
        assert_eq!(ids(&desc), vec!["other", "first", "second"]);
    }

    #[test]
    fn test_idempotent_and_reversible_without_ties() {
        let trades = vec![
            trade_on("a", 3.0, 9.0, 2025, 3, 3),
            trade_on("b", 1.0, 2.0, 2025, 3, 1),
            trade_on("c", 2.0, 0.0, 2025, 3, 7),
        ];

        for key in [SortKey::Entry, SortKey::Exit, SortKey::Date, SortKey::ProfitLoss] {
            let asc = sort_trades(&trades, key, SortDirection::Asc);
            assert_eq!(sort_trades(&asc, key, SortDirection::Asc), asc);

            let mut reversed = asc.clone();
            reversed.reverse();
            assert_eq!(sort_trades(&trades, key, SortDirection::Desc), reversed);
        }
    }

    #[test]
    fn test_parse_selectors() {
        assert_eq!("profitLoss".parse::<SortKey>().unwrap(), SortKey::ProfitLoss);
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("profit_loss".parse::<SortKey>().is_err());
        assert!("ascending".parse::<SortDirection>().is_err());
    }
}
