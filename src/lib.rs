//! Personal trading journal: a SQLite-backed trade store and the analytics
//! that turn it into a performance dashboard.
//!
//! The [`analytics`] module is pure and can be used on any trade snapshot.
//! [`commands`] wires it to the store and the persisted settings.

pub mod analytics;
pub mod commands;
pub mod db;
pub mod error;
pub mod models;

pub use analytics::{AnalyticsError, Calendar, CalendarMonth, DashboardQuery, DashboardView};
pub use commands::TradeStore;
pub use db::Database;
pub use error::{JournalError, Result};
pub use models::{CreateTradeInput, Screenshot, Settings, Trade, UpdateSettingsInput, WeekStart};
