//! Reminder sweep scenario tests

use async_trait::async_trait;
use chrono::NaiveDate;
use shiftpay::db::{self, schedule};
use shiftpay::models::{PaidStatus, ShiftCandidate, ShiftEntry};
use shiftpay::sweep::run_sweep;
use shiftpay::telegram::PromptSink;
use std::sync::Mutex;

/// Records every prompt instead of talking to Telegram.
#[derive(Default)]
struct RecordingSink {
    overdue: Mutex<Vec<i64>>,
}

#[async_trait]
impl PromptSink for RecordingSink {
    async fn prompt_new_shift(&self, _candidate: &ShiftCandidate) -> shiftpay::Result<()> {
        Ok(())
    }

    async fn prompt_overdue(&self, entry: &ShiftEntry) -> shiftpay::Result<()> {
        self.overdue.lock().unwrap().push(entry.id);
        Ok(())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

#[tokio::test]
async fn past_due_unresolved_entries_are_reminded() {
    let pool = db::init_memory_pool().await.unwrap();
    let overdue = schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();
    schedule::create(&pool, "2024-07-01", "Siena").await.unwrap(); // future

    let sink = RecordingSink::default();
    let sent = run_sweep(&pool, &sink, today()).await.unwrap();

    assert_eq!(sent, 1);
    assert_eq!(*sink.overdue.lock().unwrap(), vec![overdue]);
}

#[tokio::test]
async fn same_day_entries_are_not_past_due() {
    let pool = db::init_memory_pool().await.unwrap();
    schedule::create(&pool, "2024-06-01", "Sicilia").await.unwrap();

    let sink = RecordingSink::default();
    assert_eq!(run_sweep(&pool, &sink, today()).await.unwrap(), 0);
}

#[tokio::test]
async fn resolved_entries_are_not_reminded() {
    let pool = db::init_memory_pool().await.unwrap();
    let paid = schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();
    schedule::update_status_by_id(&pool, paid, PaidStatus::Paid).await.unwrap();
    let waiting = schedule::create(&pool, "2024-05-02", "Siena").await.unwrap();
    schedule::update_status_by_id(&pool, waiting, PaidStatus::Waiting)
        .await
        .unwrap();

    let sink = RecordingSink::default();
    assert_eq!(run_sweep(&pool, &sink, today()).await.unwrap(), 0);
}

#[tokio::test]
async fn consecutive_sweeps_renotify_without_mutating() {
    let pool = db::init_memory_pool().await.unwrap();
    let id = schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();

    let sink = RecordingSink::default();
    run_sweep(&pool, &sink, today()).await.unwrap();
    run_sweep(&pool, &sink, today()).await.unwrap();

    // Two cycles, two reminders for the same entry, no state change.
    assert_eq!(*sink.overdue.lock().unwrap(), vec![id, id]);
    let entry = &schedule::list_all(&pool).await.unwrap()[0];
    assert_eq!(entry.status, PaidStatus::Unresolved);
    assert!(!entry.notified);
}

#[tokio::test]
async fn non_canonical_dates_are_skipped() {
    let pool = db::init_memory_pool().await.unwrap();
    // A token the normalizer passed through unchanged.
    schedule::create(&pool, "sometime in May", "Sicilia").await.unwrap();
    let overdue = schedule::create(&pool, "2024-05-01", "Siena").await.unwrap();

    let sink = RecordingSink::default();
    let sent = run_sweep(&pool, &sink, today()).await.unwrap();

    assert_eq!(sent, 1);
    assert_eq!(*sink.overdue.lock().unwrap(), vec![overdue]);
}
