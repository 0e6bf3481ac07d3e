//! Overdue-reminder sweep
//!
//! Recurring background task, independent of message arrival. Each cycle
//! re-prompts for every unresolved entry whose shift date has passed:
//! at-least-once, possibly many times, until the operator resolves the
//! entry. The sweep never mutates store state.

use crate::db::schedule;
use crate::dates::parse_canonical;
use crate::telegram::PromptSink;
use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Run one sweep cycle. Returns the number of reminders sent.
///
/// Entries whose stored date is not canonical are skipped with a warning;
/// they can never be compared against `today`.
pub async fn run_sweep(
    pool: &SqlitePool,
    sink: &dyn PromptSink,
    today: NaiveDate,
) -> crate::Result<usize> {
    let unresolved = schedule::list_unresolved(pool).await?;
    let mut sent = 0;

    for entry in &unresolved {
        let Some(date) = parse_canonical(&entry.date) else {
            warn!(id = entry.id, date = %entry.date, "skipping entry with non-canonical date");
            continue;
        };
        if date >= today {
            continue;
        }
        match sink.prompt_overdue(entry).await {
            Ok(()) => sent += 1,
            Err(e) => error!(id = entry.id, "overdue reminder failed: {}", e),
        }
    }

    debug!(unresolved = unresolved.len(), sent, "sweep cycle complete");
    Ok(sent)
}

/// Spawn the sweep loop on its own task.
///
/// Cycle failures are logged and the loop continues; nothing here can
/// terminate update handling.
pub fn spawn_reminder_sweep(
    pool: SqlitePool,
    sink: Arc<dyn PromptSink>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup does not
        // double-notify right after message handling begins.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let today = Local::now().date_naive();
            if let Err(e) = run_sweep(&pool, sink.as_ref(), today).await {
                error!("reminder sweep cycle failed: {}", e);
            }
        }
    })
}
