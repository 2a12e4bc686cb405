use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::Calendar;
use super::error::AnalyticsError;
use super::metrics::validate_trades;
use crate::models::Trade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurvePoint {
    /// Axis label, `MM/DD`
    pub label: String,
    pub date: NaiveDate,
    pub trade_id: String,
    pub cumulative_pnl: f64,
}

/// Running P&L, one point per trade, in the order given.
///
/// Same-day trades are not merged.
pub fn build_equity_curve(
    trades: &[Trade],
    calendar: &Calendar,
) -> Result<Vec<EquityCurvePoint>, AnalyticsError> {
    validate_trades(trades)?;

    let mut cumulative_pnl = 0.0;
    let points = trades
        .iter()
        .map(|trade| {
            cumulative_pnl += trade.profit_loss();
            let date = calendar.local_date(trade.created_at);
            EquityCurvePoint {
                label: date.format("%m/%d").to_string(),
                date,
                trade_id: trade.id.clone(),
                cumulative_pnl,
            }
        })
        .collect();

    Ok(points)
}
