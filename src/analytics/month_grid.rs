use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::calendar::{Calendar, CalendarMonth};
use super::error::AnalyticsError;
use super::metrics::validate_trades;
use crate::models::Trade;

/// Six fixed rows of seven days
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub pnl: f64,
    pub trade_count: usize,
}

impl DaySummary {
    /// `None` for an untraded day. Break-even days count as profitable here,
    /// unlike the win rate.
    pub fn profit_state(&self) -> Option<bool> {
        if self.trade_count == 0 {
            None
        } else {
            Some(self.pnl >= 0.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Blank for leading/trailing days of the adjacent months
    pub summary: Option<DaySummary>,
}

impl CalendarCell {
    pub fn in_month(&self) -> bool {
        self.summary.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub month: CalendarMonth,
    pub monthly_pnl: f64,
    pub cells: Vec<CalendarCell>,
}

/// Lay out `month` on a 6x7 grid and bucket the trades of that month per day.
///
/// Takes the unfiltered collection; trades outside the month are ignored.
pub fn build_month_grid(
    trades: &[Trade],
    month: CalendarMonth,
    calendar: &Calendar,
) -> Result<MonthGrid, AnalyticsError> {
    validate_trades(trades)?;

    let mut by_day: HashMap<NaiveDate, DaySummary> = HashMap::new();
    for trade in trades {
        let date = calendar.local_date(trade.created_at);
        if !month.contains(date) {
            continue;
        }
        let day = by_day.entry(date).or_insert(DaySummary { pnl: 0.0, trade_count: 0 });
        day.pnl += trade.profit_loss();
        day.trade_count += 1;
    }

    let first = month.first_day();
    let lead = calendar.weekday_index(first);
    let out_of_range = || AnalyticsError::InvalidMonth(month.to_string());
    let grid_start = first
        .checked_sub_days(Days::new(u64::from(lead)))
        .ok_or_else(out_of_range)?;

    let mut monthly_pnl = 0.0;
    let mut cells = Vec::with_capacity(GRID_CELLS);
    for idx in 0..GRID_CELLS {
        let date = grid_start
            .checked_add_days(Days::new(idx as u64))
            .ok_or_else(out_of_range)?;
        let summary = month.contains(date).then(|| {
            by_day
                .get(&date)
                .copied()
                .unwrap_or(DaySummary { pnl: 0.0, trade_count: 0 })
        });
        if let Some(day) = summary {
            monthly_pnl += day.pnl;
        }
        cells.push(CalendarCell { date, summary });
    }

    Ok(MonthGrid {
        month,
        monthly_pnl,
        cells,
    })
}
