//! Owner-scoped repository for database operations.
//!
//! Every query binds the owning user id, so tenant isolation is enforced once
//! at this boundary instead of ad hoc per operation. Methods are organized
//! across submodules by entity:
//! - `tipsters.rs` - tipster CRUD and cascade delete
//! - `picks.rs` - pick CRUD and last-pick-date upkeep
//! - `follows.rs` - follow CRUD

mod follows;
mod picks;
mod tipsters;

pub use follows::NewFollow;
pub use picks::NewPick;
pub use tipsters::TipsterCascade;

use crate::domain::{BetResult, Decimal, Odds, PickKind, Stake};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

pub(crate) const DATE_FMT: &str = "%Y-%m-%d";
pub(crate) const TIME_FMT: &str = "%H:%M:%S";
/// ISO 8601 with 'T'; lexicographic order matches chronological order, so
/// `ORDER BY placed_at` works on the stored strings.
pub(crate) const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn column_decode_err(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

pub(crate) fn get_decimal(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str_canonical(&raw).map_err(|e| column_decode_err(column, e))
}

pub(crate) fn get_odds(row: &SqliteRow, column: &str) -> Result<Odds, sqlx::Error> {
    Odds::new(get_decimal(row, column)?).map_err(|e| column_decode_err(column, e))
}

pub(crate) fn get_stake(row: &SqliteRow, column: &str) -> Result<Stake, sqlx::Error> {
    Stake::new(get_decimal(row, column)?).map_err(|e| column_decode_err(column, e))
}

pub(crate) fn get_date(row: &SqliteRow, column: &str) -> Result<NaiveDate, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    NaiveDate::parse_from_str(&raw, DATE_FMT).map_err(|e| column_decode_err(column, e))
}

pub(crate) fn get_opt_date(row: &SqliteRow, column: &str) -> Result<Option<NaiveDate>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|s| NaiveDate::parse_from_str(&s, DATE_FMT).map_err(|e| column_decode_err(column, e)))
        .transpose()
}

pub(crate) fn get_time(row: &SqliteRow, column: &str) -> Result<NaiveTime, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    NaiveTime::parse_from_str(&raw, TIME_FMT).map_err(|e| column_decode_err(column, e))
}

pub(crate) fn get_datetime(row: &SqliteRow, column: &str) -> Result<NaiveDateTime, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    NaiveDateTime::parse_from_str(&raw, DATETIME_FMT).map_err(|e| column_decode_err(column, e))
}

pub(crate) fn get_result(row: &SqliteRow, column: &str) -> Result<BetResult, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    BetResult::parse_label(&raw).map_err(|e| column_decode_err(column, e))
}

pub(crate) fn get_kind(row: &SqliteRow, column: &str) -> Result<PickKind, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    PickKind::parse_label(&raw).map_err(|e| column_decode_err(column, e))
}
