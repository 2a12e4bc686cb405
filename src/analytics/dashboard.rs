use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::{Calendar, CalendarMonth};
use super::equity::{build_equity_curve, EquityCurvePoint};
use super::error::AnalyticsError;
use super::filters::{filter_by_outcome, filter_by_time_frame, OutcomeFilter, TimeFrame};
use super::metrics::{self, PerformanceSnapshot};
use super::month_grid::{build_month_grid, MonthGrid};
use super::sort::{sort_trades, SortDirection, SortKey};
use crate::models::Trade;

/// Selection state of the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub time_frame: TimeFrame,
    pub outcome: OutcomeFilter,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    /// Calendar month to display, defaults to the month of `now`
    pub month: Option<CalendarMonth>,
}

impl DashboardQuery {
    /// Build a query from raw selector strings, rejecting unknown values.
    /// Missing selectors take the dashboard defaults.
    pub fn parse(
        time_frame: Option<&str>,
        outcome: Option<&str>,
        sort_key: Option<&str>,
        sort_direction: Option<&str>,
        month: Option<&str>,
    ) -> Result<Self, AnalyticsError> {
        Ok(Self {
            time_frame: time_frame.map(str::parse::<TimeFrame>).transpose()?.unwrap_or_default(),
            outcome: outcome.map(str::parse::<OutcomeFilter>).transpose()?.unwrap_or_default(),
            sort_key: sort_key.map(str::parse::<SortKey>).transpose()?.unwrap_or_default(),
            sort_direction: sort_direction.map(str::parse::<SortDirection>).transpose()?.unwrap_or_default(),
            month: month.map(str::parse::<CalendarMonth>).transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub total_pnl: f64,
    pub win_rate: f64,
    pub consistency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub stats: DashboardStats,
    /// `None` when the selection holds no trades
    pub snapshot: Option<PerformanceSnapshot>,
    pub equity_curve: Vec<EquityCurvePoint>,
    pub trades: Vec<Trade>,
    pub calendar: MonthGrid,
}

/// Everything the dashboard shows for one selection.
///
/// Values stay at full precision through aggregation; `total_pnl` is rounded here.
pub fn build_dashboard(
    trades: &[Trade],
    query: &DashboardQuery,
    now: DateTime<Utc>,
    calendar: &Calendar,
) -> Result<DashboardView, AnalyticsError> {
    metrics::validate_trades(trades)?;

    let in_frame = filter_by_time_frame(trades, query.time_frame, now, calendar);
    let selected = filter_by_outcome(&in_frame, query.outcome);

    log::debug!(
        "Dashboard: {} of {} trades selected ({:?}/{:?})",
        selected.len(),
        trades.len(),
        query.time_frame,
        query.outcome
    );

    let stats = DashboardStats {
        total_trades: selected.len(),
        wins: selected.iter().filter(|t| t.is_winner()).count(),
        losses: selected.iter().filter(|t| t.is_loser()).count(),
        breakevens: selected.iter().filter(|t| !t.is_winner() && !t.is_loser()).count(),
        total_pnl: metrics::round2(metrics::total_pnl(&selected)?),
        win_rate: metrics::win_rate(&selected)?,
        consistency: metrics::consistency(&selected, calendar)?,
    };

    let snapshot = match metrics::performance_snapshot(&selected) {
        Ok(snapshot) => Some(snapshot),
        Err(AnalyticsError::NoData) => None,
        Err(e) => return Err(e),
    };

    let chronological = sort_trades(&selected, SortKey::Date, SortDirection::Asc);
    let equity_curve = build_equity_curve(&chronological, calendar)?;

    let month = query
        .month
        .unwrap_or_else(|| CalendarMonth::containing(calendar.local_date(now)));
    let calendar_grid = build_month_grid(trades, month, calendar)?;

    Ok(DashboardView {
        stats,
        snapshot,
        equity_curve,
        trades: sort_trades(&selected, query.sort_key, query.sort_direction),
        calendar: calendar_grid,
    })
}
