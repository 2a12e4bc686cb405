use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::calendar::Calendar;
use super::error::AnalyticsError;
use crate::models::{timestamp_in_range, Trade};

/// Summary of per-trade P&L over a non-empty collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub total_trades: usize,
    pub highest_pnl: f64,
    pub lowest_pnl: f64,
    /// Rounded to 2 decimals
    pub avg_pnl: f64,
}

/// Round to cents for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fail the whole computation on the first trade with a non-finite price or P&L,
/// or a timestamp no calendar can place
pub fn validate_trades(trades: &[Trade]) -> Result<(), AnalyticsError> {
    for trade in trades {
        let fields = [
            ("entry", trade.entry),
            ("exit", trade.exit),
            ("profitLoss", trade.profit_loss()),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(AnalyticsError::InvalidTrade {
                    id: trade.id.clone(),
                    field,
                    value,
                });
            }
        }
        if !timestamp_in_range(trade.created_at) {
            return Err(AnalyticsError::InvalidTimestamp {
                id: trade.id.clone(),
                created_at: trade.created_at,
            });
        }
    }
    Ok(())
}

/// Sum of P&L at full precision
pub fn total_pnl(trades: &[Trade]) -> Result<f64, AnalyticsError> {
    validate_trades(trades)?;
    Ok(trades.iter().map(Trade::profit_loss).sum())
}

/// Percentage of trades with strictly positive P&L
pub fn win_rate(trades: &[Trade]) -> Result<f64, AnalyticsError> {
    validate_trades(trades)?;
    if trades.is_empty() {
        return Ok(0.0);
    }

    let winners = trades.iter().filter(|t| t.is_winner()).count();
    Ok(round2(winners as f64 / trades.len() as f64 * 100.0))
}

/// Longest run of winning trading days over the number of distinct trading days.
///
/// A day wins when at least one of its trades has positive P&L. Untraded days
/// between two trading days do not break a run.
pub fn consistency(trades: &[Trade], calendar: &Calendar) -> Result<f64, AnalyticsError> {
    validate_trades(trades)?;

    let mut days: BTreeMap<_, bool> = BTreeMap::new();
    for trade in trades {
        let winning = days.entry(calendar.local_date(trade.created_at)).or_insert(false);
        *winning |= trade.is_winner();
    }

    if days.is_empty() {
        return Ok(0.0);
    }

    let mut longest = 0usize;
    let mut current = 0usize;
    for &winning in days.values() {
        if winning {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    Ok(round2(longest as f64 / days.len() as f64 * 100.0))
}

pub fn performance_snapshot(trades: &[Trade]) -> Result<PerformanceSnapshot, AnalyticsError> {
    validate_trades(trades)?;

    let mut pnls = trades.iter().map(Trade::profit_loss);
    let first = pnls.next().ok_or(AnalyticsError::NoData)?;

    let (highest, lowest, sum) = pnls.fold((first, first, first), |(hi, lo, sum), pnl| {
        (hi.max(pnl), lo.min(pnl), sum + pnl)
    });

    Ok(PerformanceSnapshot {
        total_trades: trades.len(),
        highest_pnl: highest,
        lowest_pnl: lowest,
        avg_pnl: round2(sum / trades.len() as f64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{trade_at, trade_on};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_same_day_winner_and_loser() {
        let trades = vec![
            trade_on("a", 10.0, 15.0, 2025, 3, 3),
            trade_on("b", 20.0, 18.0, 2025, 3, 3),
        ];
        let calendar = Calendar::utc();

        assert_eq!(total_pnl(&trades).unwrap(), 3.0);
        assert_eq!(win_rate(&trades).unwrap(), 50.0);
        assert_eq!(consistency(&trades, &calendar).unwrap(), 100.0);
    }

    #[test]
    fn test_alternating_days_streak() {
        let trades = vec![
            trade_on("a", 0.0, 5.0, 2025, 3, 3),
            trade_on("b", 3.0, 0.0, 2025, 3, 4),
            trade_on("c", 0.0, 2.0, 2025, 3, 5),
        ];

        assert_eq!(consistency(&trades, &Calendar::utc()).unwrap(), 33.33);
    }

    #[test]
    fn test_streak_ignores_calendar_gaps() {
        // Winning days a week apart still form one run
        let trades = vec![
            trade_on("a", 0.0, 1.0, 2025, 3, 3),
            trade_on("b", 0.0, 1.0, 2025, 3, 10),
            trade_on("c", 0.0, 1.0, 2025, 3, 24),
            trade_on("d", 1.0, 0.0, 2025, 3, 25),
        ];

        assert_eq!(consistency(&trades, &Calendar::utc()).unwrap(), 75.0);
    }

    #[test]
    fn test_consistency_sorts_days_regardless_of_input_order() {
        let trades = vec![
            trade_on("c", 0.0, 1.0, 2025, 3, 5),
            trade_on("a", 0.0, 1.0, 2025, 3, 3),
            trade_on("b", 1.0, 0.0, 2025, 3, 4),
        ];

        // Days sorted: win, loss, win
        assert_eq!(consistency(&trades, &Calendar::utc()).unwrap(), 33.33);
    }

    #[test]
    fn test_break_even_counts_toward_total_only() {
        let trades = vec![
            trade_on("a", 1.0, 2.0, 2025, 3, 3),
            trade_on("b", 2.0, 2.0, 2025, 3, 4),
            trade_on("c", 4.0, 1.0, 2025, 3, 5),
        ];

        assert_eq!(win_rate(&trades).unwrap(), 33.33);
        assert_eq!(total_pnl(&trades).unwrap(), -2.0);
        // The break-even day is not a winning day
        assert_eq!(consistency(&trades, &Calendar::utc()).unwrap(), 33.33);
    }

    #[test]
    fn test_empty_collection() {
        let calendar = Calendar::utc();

        assert_eq!(total_pnl(&[]).unwrap(), 0.0);
        assert_eq!(win_rate(&[]).unwrap(), 0.0);
        assert_eq!(consistency(&[], &calendar).unwrap(), 0.0);
        assert_eq!(performance_snapshot(&[]), Err(AnalyticsError::NoData));
    }

    #[test]
    fn test_performance_snapshot() {
        let trades = vec![
            trade_on("a", 100.0, 112.5, 2025, 3, 3),
            trade_on("b", 50.0, 47.0, 2025, 3, 4),
            trade_on("c", 10.0, 10.01, 2025, 3, 5),
        ];

        let snapshot = performance_snapshot(&trades).unwrap();
        assert_eq!(snapshot.total_trades, 3);
        assert_eq!(snapshot.highest_pnl, 12.5);
        assert_eq!(snapshot.lowest_pnl, -3.0);
        assert_eq!(snapshot.avg_pnl, 3.17);
    }

    #[test]
    fn test_invalid_price_fails_whole_computation() {
        let at = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        let trades = vec![
            trade_at("ok", "SPY", 1.0, 2.0, at),
            trade_at("broken", "QQQ", 1.0, f64::NAN, at),
        ];

        let err = total_pnl(&trades).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidTrade { ref id, field: "exit", .. } if id == "broken"));
        assert!(win_rate(&trades).is_err());
        assert!(consistency(&trades, &Calendar::utc()).is_err());
        assert!(performance_snapshot(&trades).is_err());
    }

    #[test]
    fn test_overflowing_profit_loss_fails() {
        let trades = vec![
            trade_on("up", -1e308, 1e308, 2025, 3, 3),
            trade_on("down", 1e308, -1e308, 2025, 3, 4),
        ];

        let err = total_pnl(&trades).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidTrade { ref id, field: "profitLoss", .. } if id == "up"));
        assert!(performance_snapshot(&trades).is_err());
    }

    #[test]
    fn test_out_of_range_timestamp_fails_instead_of_panicking() {
        use crate::models::WeekStart;
        use chrono::{DateTime, FixedOffset};

        let trades = vec![trade_at("edge", "SPY", 1.0, 2.0, DateTime::<Utc>::MAX_UTC)];
        let plus_one = Calendar::new(FixedOffset::east_opt(3600).unwrap(), WeekStart::Sunday);

        let err = consistency(&trades, &plus_one).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidTimestamp { ref id, .. } if id == "edge"));
    }

    #[test]
    fn test_full_precision_total() {
        let trades: Vec<Trade> = (0..10)
            .map(|i| trade_on(&format!("t{}", i), 0.0, 0.001, 2025, 3, 3))
            .collect();

        let total = total_pnl(&trades).unwrap();
        assert!((total - 0.01).abs() < 1e-12);
        assert_eq!(round2(total), 0.01);
    }
}
