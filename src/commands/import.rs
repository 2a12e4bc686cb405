use chrono::{SecondsFormat, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::commands::settings::load_settings;
use crate::commands::trades::{generate_trade_id, get_trades, load_trades, upsert_trade};
use crate::db::Database;
use crate::error::{JournalError, Result};
use crate::models::{CreateTradeInput, Settings, Trade};

const BACKUP_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct BackupData {
    pub settings: Settings,
    pub trades: Vec<Trade>,
    pub export_date: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Trades written, new or replaced
    pub imported: usize,
    /// Of those, how many overwrote a trade with the same id
    pub replaced: usize,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    ticker: &'a str,
    entry: f64,
    exit: f64,
    profit_loss: f64,
    created_at: String,
    strategy: &'a str,
    comments: &'a str,
}

/// Export all data to JSON
pub fn export_all_data(db: &Database) -> Result<String> {
    let backup = {
        let conn = db.conn.lock()?;
        BackupData {
            settings: load_settings(&conn)?,
            trades: load_trades(&conn)?,
            export_date: Utc::now().to_rfc3339(),
            version: BACKUP_VERSION.to_string(),
        }
    };

    log::info!("Exporting {} trades", backup.trades.len());
    Ok(serde_json::to_string_pretty(&backup)?)
}

fn reject_record(index: usize, reason: impl std::fmt::Display) -> JournalError {
    log::warn!("Rejected import record {}: {}", index, reason);
    JournalError::ValidationError(format!("record {}: {}", index, reason))
}

/// Split a payload into optional settings and raw trade records.
///
/// Accepts a backup envelope or a bare array as written by the web journal's export.
fn split_payload(json_data: &str) -> Result<(Option<Settings>, Vec<Value>)> {
    match serde_json::from_str::<Value>(json_data)? {
        Value::Array(records) => Ok((None, records)),
        Value::Object(mut envelope) => {
            let settings = match envelope.remove("settings") {
                None | Some(Value::Null) => None,
                Some(value) => Some(
                    serde_json::from_value::<Settings>(value)
                        .map_err(|e| JournalError::ParseError(format!("settings: {}", e)))?,
                ),
            };
            match envelope.remove("trades") {
                Some(Value::Array(records)) => Ok((settings, records)),
                _ => Err(JournalError::ParseError("backup has no trades array".to_string())),
            }
        }
        _ => Err(JournalError::ParseError(
            "expected a backup object or an array of trades".to_string(),
        )),
    }
}

/// Decode and validate every record before anything is written
fn parse_drafts(records: Vec<Value>) -> Result<Vec<CreateTradeInput>> {
    let mut seen_ids = HashSet::new();
    let mut drafts = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let mut draft: CreateTradeInput =
            serde_json::from_value(record).map_err(|e| reject_record(index, e))?;
        draft.validate().map_err(|reason| reject_record(index, reason))?;

        draft.id = draft.id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty());
        if let Some(id) = &draft.id {
            if !seen_ids.insert(id.clone()) {
                return Err(reject_record(index, format!("duplicate id {}", id)));
            }
        }
        drafts.push(draft);
    }

    Ok(drafts)
}

/// Import data from a JSON backup or a bare trade array
pub fn import_all_data(db: &Database, json_data: &str) -> Result<ImportResult> {
    let (settings, records) = split_payload(json_data)?;
    let drafts = parse_drafts(records)?;

    let now = Utc::now();
    let conn = db.conn.lock()?;
    let tx = conn.unchecked_transaction()?;

    if let Some(settings) = &settings {
        settings.calendar().map_err(JournalError::SettingsError)?;
        tx.execute(
            "UPDATE settings SET currency = ?, week_start = ?, utc_offset_minutes = ?, updated_at = ? WHERE id = 1",
            params![
                settings.currency,
                settings.week_start.as_str(),
                settings.utc_offset_minutes,
                now.timestamp()
            ],
        )?;
    }

    let mut result = ImportResult { imported: 0, replaced: 0 };
    for mut draft in drafts {
        let id = draft.id.take().unwrap_or_else(|| generate_trade_id(now));
        let trade = draft.into_trade(id, now);

        if upsert_trade(&tx, &trade, now.timestamp())? {
            result.replaced += 1;
        }
        result.imported += 1;
    }

    tx.commit()?;

    log::info!(
        "Imported {} trades ({} replaced){}",
        result.imported,
        result.replaced,
        if settings.is_some() { ", settings restored" } else { "" }
    );
    Ok(result)
}

/// Journal as CSV, one row per trade in insertion order
pub fn export_trades_csv(db: &Database) -> Result<String> {
    let trades = get_trades(db)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for trade in &trades {
        writer.serialize(CsvRow {
            id: &trade.id,
            ticker: &trade.ticker,
            entry: trade.entry,
            exit: trade.exit,
            profit_loss: trade.profit_loss(),
            created_at: trade.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            strategy: trade.strategy.as_deref().unwrap_or(""),
            comments: trade.comments.as_deref().unwrap_or(""),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| JournalError::ParseError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| JournalError::ParseError(e.to_string()))
}
