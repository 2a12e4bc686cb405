use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::Database;
use crate::error::{JournalError, Result};
use crate::models::{CreateTradeInput, Screenshot, Trade};

/// Durable home of the trade collection
pub trait TradeStore {
    /// Every stored trade, in insertion order
    fn list_trades(&self) -> Result<Vec<Trade>>;

    fn create_trade(&self, draft: CreateTradeInput) -> Result<Trade>;
}

impl TradeStore for Database {
    fn list_trades(&self) -> Result<Vec<Trade>> {
        get_trades(self)
    }

    fn create_trade(&self, draft: CreateTradeInput) -> Result<Trade> {
        create_trade(self, draft)
    }
}

const TRADE_COLUMNS: &str =
    "id, ticker, entry_price, exit_price, created_at, strategy, comments, screenshots";

/// Helper function to map a database row to a Trade struct
fn map_row_to_trade(row: &rusqlite::Row) -> rusqlite::Result<Trade> {
    let created_at_ms: i64 = row.get(4)?;
    let screenshots_json: String = row.get(7)?;

    let created_at = DateTime::<Utc>::from_timestamp_millis(created_at_ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Integer,
            format!("Invalid timestamp: {}", created_at_ms).into(),
        )
    })?;
    let screenshots: Vec<Screenshot> = serde_json::from_str(&screenshots_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Trade {
        id: row.get(0)?,
        ticker: row.get(1)?,
        entry: row.get(2)?,
        exit: row.get(3)?,
        created_at,
        strategy: row.get(5)?,
        comments: row.get(6)?,
        screenshots,
    })
}

pub fn generate_trade_id(now: DateTime<Utc>) -> String {
    format!("TRADE-{}-{}", now.timestamp_millis(), uuid::Uuid::new_v4())
}

/// Insert or overwrite a trade by id. Overwrites keep their insertion slot.
pub(crate) fn upsert_trade(conn: &Connection, trade: &Trade, stored_at: i64) -> Result<bool> {
    let screenshots = serde_json::to_string(&trade.screenshots)?;

    let replaced = conn.execute(
        "UPDATE trades SET ticker = ?, entry_price = ?, exit_price = ?, created_at = ?,
                strategy = ?, comments = ?, screenshots = ?, stored_at = ?
         WHERE id = ?",
        params![
            trade.ticker,
            trade.entry,
            trade.exit,
            trade.created_at.timestamp_millis(),
            trade.strategy,
            trade.comments,
            screenshots,
            stored_at,
            trade.id
        ],
    )?;
    if replaced > 0 {
        return Ok(true);
    }

    conn.execute(
        "INSERT INTO trades (id, ticker, entry_price, exit_price, created_at, strategy, comments, screenshots, stored_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            trade.id,
            trade.ticker,
            trade.entry,
            trade.exit,
            trade.created_at.timestamp_millis(),
            trade.strategy,
            trade.comments,
            screenshots,
            stored_at
        ],
    )?;
    Ok(false)
}

pub(crate) fn load_trades(conn: &Connection) -> Result<Vec<Trade>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM trades ORDER BY seq ASC", TRADE_COLUMNS))?;
    let trades = stmt
        .query_map([], map_row_to_trade)?
        .collect::<rusqlite::Result<Vec<Trade>>>()?;

    Ok(trades)
}

pub fn get_trades(db: &Database) -> Result<Vec<Trade>> {
    let conn = db.conn.lock()?;
    load_trades(&conn)
}

pub fn get_trade(db: &Database, id: &str) -> Result<Trade> {
    let conn = db.conn.lock()?;

    conn.query_row(
        &format!("SELECT {} FROM trades WHERE id = ?", TRADE_COLUMNS),
        [id],
        map_row_to_trade,
    )
    .optional()?
    .ok_or_else(|| JournalError::NotFound(id.to_string()))
}

pub fn create_trade(db: &Database, draft: CreateTradeInput) -> Result<Trade> {
    draft.validate().map_err(JournalError::ValidationError)?;

    let now = Utc::now();
    let trade = draft.into_trade(generate_trade_id(now), now);

    {
        let conn = db.conn.lock()?;
        upsert_trade(&conn, &trade, now.timestamp())?;
    }

    log::info!("Created trade {} ({})", trade.id, trade.ticker);
    get_trade(db, &trade.id)
}

pub fn delete_trade(db: &Database, id: &str) -> Result<()> {
    let conn = db.conn.lock()?;
    let deleted = conn.execute("DELETE FROM trades WHERE id = ?", [id])?;
    if deleted == 0 {
        return Err(JournalError::NotFound(id.to_string()));
    }
    Ok(())
}

pub fn delete_all_trades(db: &Database) -> Result<usize> {
    let conn = db.conn.lock()?;
    let count = conn.execute("DELETE FROM trades", [])?;
    Ok(count)
}
