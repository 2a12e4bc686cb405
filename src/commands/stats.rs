use chrono::{DateTime, Utc};

use crate::analytics::{build_dashboard, DashboardQuery, DashboardView};
use crate::commands::settings::get_settings;
use crate::commands::trades::TradeStore;
use crate::db::Database;
use crate::error::{JournalError, Result};

/// Load the journal and compute the dashboard for one selection
pub fn get_dashboard(db: &Database, query: &DashboardQuery, now: DateTime<Utc>) -> Result<DashboardView> {
    let calendar = get_settings(db)?
        .calendar()
        .map_err(JournalError::SettingsError)?;
    let trades = db.list_trades()?;

    Ok(build_dashboard(&trades, query, now, &calendar)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsError, OutcomeFilter, TimeFrame};
    use crate::commands::settings::update_settings;
    use crate::models::{CreateTradeInput, UpdateSettingsInput, WeekStart};
    use chrono::TimeZone;

    fn seed(db: &Database) {
        let day = |d: u32| Utc.with_ymd_and_hms(2025, 3, d, 15, 0, 0).unwrap();
        for (ticker, entry, exit, d) in [
            ("AAPL", 10.0, 15.0, 3),
            ("MSFT", 20.0, 18.0, 4),
            ("NVDA", 5.0, 9.0, 10),
            ("AMD", 7.0, 7.0, 11),
        ] {
            db.create_trade(CreateTradeInput::new(ticker, entry, exit).created_at(day(d))).unwrap();
        }
    }

    #[test]
    fn test_dashboard_from_store() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let now = Utc.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap();

        let view = get_dashboard(&db, &DashboardQuery::default(), now).unwrap();

        assert_eq!(view.stats.total_trades, 4);
        assert_eq!(view.stats.wins, 2);
        assert_eq!(view.stats.losses, 1);
        assert_eq!(view.stats.breakevens, 1);
        assert_eq!(view.stats.total_pnl, 7.0);
        assert_eq!(view.stats.win_rate, 50.0);
        assert_eq!(view.trades[0].ticker, "AMD");
        assert_eq!(view.equity_curve.last().unwrap().cumulative_pnl, 7.0);
        assert_eq!(view.calendar.monthly_pnl, 7.0);
    }

    #[test]
    fn test_weekly_frame_follows_week_start_setting() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        // Sunday 2025-03-09
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 18, 0, 0).unwrap();
        let query = DashboardQuery {
            time_frame: TimeFrame::Weekly,
            ..Default::default()
        };

        let tickers = |view: &DashboardView| -> Vec<String> {
            view.trades.iter().map(|t| t.ticker.clone()).collect()
        };

        // Sunday-first week is 03-09..03-15
        let view = get_dashboard(&db, &query, now).unwrap();
        assert_eq!(tickers(&view), vec!["AMD", "NVDA"]);

        // Monday-first week is 03-03..03-09
        update_settings(
            &db,
            UpdateSettingsInput {
                week_start: Some(WeekStart::Monday),
                ..Default::default()
            },
        )
        .unwrap();
        let view = get_dashboard(&db, &query, now).unwrap();
        assert_eq!(tickers(&view), vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn test_outcome_filter_and_parse_errors() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let now = Utc.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap();

        let query = DashboardQuery {
            outcome: OutcomeFilter::Losers,
            ..Default::default()
        };
        let view = get_dashboard(&db, &query, now).unwrap();
        assert_eq!(view.stats.total_trades, 1);
        assert_eq!(view.trades[0].ticker, "MSFT");

        let err = DashboardQuery::parse(Some("yearly"), None, None, None, None).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidSelector { .. }));
    }
}
