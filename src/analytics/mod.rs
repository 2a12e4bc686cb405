//! Trade analytics: pure functions from a trade snapshot to dashboard metrics.
//!
//! Nothing in here reads the clock, touches storage or keeps state. The
//! reference instant and calendar convention are always passed in.

pub mod calendar;
pub mod dashboard;
pub mod equity;
pub mod error;
pub mod filters;
pub mod metrics;
pub mod month_grid;
pub mod sort;

pub use calendar::{Calendar, CalendarMonth};
pub use dashboard::{build_dashboard, DashboardQuery, DashboardStats, DashboardView};
pub use equity::{build_equity_curve, EquityCurvePoint};
pub use error::AnalyticsError;
pub use filters::{filter_by_outcome, filter_by_time_frame, OutcomeFilter, TimeFrame};
pub use metrics::{consistency, performance_snapshot, round2, total_pnl, win_rate, PerformanceSnapshot};
pub use month_grid::{build_month_grid, CalendarCell, DaySummary, MonthGrid, GRID_CELLS};
pub use sort::{sort_trades, SortDirection, SortKey};
