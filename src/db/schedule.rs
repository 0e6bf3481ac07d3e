//! Schedule store operations
//!
//! Exclusive owner of `schedule` rows. Creation is append-only, status
//! changes are in-place single-statement updates (per-row atomic,
//! last-writer-wins), and nothing here deletes. Duplicate (date, hall)
//! rows are permitted: repeated chat posts legitimately yield repeated
//! entries.

use crate::models::{PaidStatus, ShiftEntry};
use crate::Result;
use sqlx::{Row, SqlitePool};

/// Append a new entry with status unresolved and `notified = false`.
/// Returns the assigned id.
pub async fn create(pool: &SqlitePool, date: &str, hall: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO schedule (date, hall) VALUES (?, ?)")
        .bind(date)
        .bind(hall)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Set the status of one entry by id. Idempotent; returns rows affected
/// (0 when the id does not exist).
pub async fn update_status_by_id(pool: &SqlitePool, id: i64, status: PaidStatus) -> Result<u64> {
    let result = sqlx::query("UPDATE schedule SET paid_status = ? WHERE id = ?")
        .bind(status.as_column())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Set the status of every entry matching the natural key (date, hall).
///
/// Natural-key prompts cannot disambiguate duplicates, so all matching
/// rows are updated. Returns rows affected.
pub async fn update_status_by_key(
    pool: &SqlitePool,
    date: &str,
    hall: &str,
    status: PaidStatus,
) -> Result<u64> {
    let result = sqlx::query("UPDATE schedule SET paid_status = ? WHERE date = ? AND hall = ?")
        .bind(status.as_column())
        .bind(date)
        .bind(hall)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Record that the initial prompt for an entry has been sent.
pub async fn mark_notified(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("UPDATE schedule SET notified = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Entries matching the natural key (date, hall).
pub async fn find_by_key(pool: &SqlitePool, date: &str, hall: &str) -> Result<Vec<ShiftEntry>> {
    let rows = sqlx::query(
        "SELECT id, date, hall, notified, paid_status FROM schedule WHERE date = ? AND hall = ? ORDER BY id",
    )
    .bind(date)
    .bind(hall)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(entry_from_row).collect())
}

/// Entries whose status is still unresolved.
pub async fn list_unresolved(pool: &SqlitePool) -> Result<Vec<ShiftEntry>> {
    let rows = sqlx::query(
        "SELECT id, date, hall, notified, paid_status FROM schedule WHERE paid_status IS NULL ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(entry_from_row).collect())
}

/// Full dump, for reporting.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<ShiftEntry>> {
    let rows = sqlx::query("SELECT id, date, hall, notified, paid_status FROM schedule ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(entry_from_row).collect())
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> ShiftEntry {
    let status: Option<String> = row.get("paid_status");
    ShiftEntry {
        id: row.get("id"),
        date: row.get("date"),
        hall: row.get("hall"),
        notified: row.get::<i64, _>("notified") != 0,
        status: PaidStatus::from_column(status.as_deref()),
    }
}
