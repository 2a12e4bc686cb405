use chrono::FixedOffset;
use rusqlite::Connection;

use crate::db::Database;
use crate::error::{JournalError, Result};
use crate::models::{Settings, UpdateSettingsInput, WeekStart};

pub fn get_settings(db: &Database) -> Result<Settings> {
    let conn = db.conn.lock()?;
    load_settings(&conn)
}

pub(crate) fn load_settings(conn: &Connection) -> Result<Settings> {
    let settings = conn.query_row(
        "SELECT id, currency, week_start, utc_offset_minutes, created_at, updated_at FROM settings WHERE id = 1",
        [],
        |row| {
            let week_start: String = row.get(2)?;
            let week_start = WeekStart::parse(&week_start).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    2,
                    rusqlite::types::Type::Text,
                    format!("Unknown week start: {}", week_start).into(),
                )
            })?;

            Ok(Settings {
                id: row.get(0)?,
                currency: row.get(1)?,
                week_start,
                utc_offset_minutes: row.get(3)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
            })
        },
    )?;

    Ok(settings)
}

pub fn update_settings(db: &Database, settings: UpdateSettingsInput) -> Result<Settings> {
    if let Some(minutes) = settings.utc_offset_minutes {
        if FixedOffset::east_opt(minutes * 60).is_none() {
            return Err(JournalError::SettingsError(format!(
                "UTC offset must be within a day, got {} minutes",
                minutes
            )));
        }
    }
    if let Some(currency) = &settings.currency {
        if currency.trim().is_empty() {
            return Err(JournalError::SettingsError("currency must not be empty".to_string()));
        }
    }

    {
        let conn = db.conn.lock()?;

        // Build dynamic UPDATE query
        let mut updates = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(val) = settings.currency {
            updates.push("currency = ?");
            values.push(Box::new(val.trim().to_string()));
        }
        if let Some(val) = settings.week_start {
            updates.push("week_start = ?");
            values.push(Box::new(val.as_str()));
        }
        if let Some(val) = settings.utc_offset_minutes {
            updates.push("utc_offset_minutes = ?");
            values.push(Box::new(val));
        }

        updates.push("updated_at = strftime('%s', 'now')");

        let query = format!("UPDATE settings SET {} WHERE id = 1", updates.join(", "));
        let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();

        conn.execute(&query, params.as_slice())?;
    }

    get_settings(db)
}
