//! Schedule store integration tests over in-memory SQLite

use shiftpay::db::{self, schedule};
use shiftpay::models::PaidStatus;
use shiftpay::status::{self, CallbackAction};
use sqlx::SqlitePool;

async fn setup_pool() -> SqlitePool {
    db::init_memory_pool().await.expect("in-memory pool")
}

#[tokio::test]
async fn created_entry_is_listed_unresolved() {
    let pool = setup_pool().await;
    let id = schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();

    let unresolved = schedule::list_unresolved(&pool).await.unwrap();
    assert_eq!(unresolved.len(), 1);
    let entry = &unresolved[0];
    assert_eq!(entry.id, id);
    assert_eq!(entry.date, "2024-05-01");
    assert_eq!(entry.hall, "Sicilia");
    assert_eq!(entry.status, PaidStatus::Unresolved);
    assert!(!entry.notified);
}

#[tokio::test]
async fn paid_entry_leaves_unresolved_list() {
    let pool = setup_pool().await;
    let id = schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();
    schedule::create(&pool, "2024-05-02", "Siena").await.unwrap();

    let affected = schedule::update_status_by_id(&pool, id, PaidStatus::Paid)
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let unresolved = schedule::list_unresolved(&pool).await.unwrap();
    assert!(unresolved.iter().all(|e| e.id != id));
    assert_eq!(unresolved.len(), 1);
}

#[tokio::test]
async fn status_update_is_idempotent() {
    let pool = setup_pool().await;
    let id = schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();

    schedule::update_status_by_id(&pool, id, PaidStatus::Paid).await.unwrap();
    let affected = schedule::update_status_by_id(&pool, id, PaidStatus::Paid)
        .await
        .unwrap();
    // Second identical update still reports the row, state is unchanged.
    assert_eq!(affected, 1);
    let all = schedule::list_all(&pool).await.unwrap();
    assert_eq!(all[0].status, PaidStatus::Paid);
}

#[tokio::test]
async fn operator_can_correct_a_prior_choice() {
    let pool = setup_pool().await;
    let id = schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();

    schedule::update_status_by_id(&pool, id, PaidStatus::Waiting).await.unwrap();
    schedule::update_status_by_id(&pool, id, PaidStatus::Paid).await.unwrap();

    let all = schedule::list_all(&pool).await.unwrap();
    assert_eq!(all[0].status, PaidStatus::Paid);
}

#[tokio::test]
async fn natural_key_update_hits_all_duplicates() {
    let pool = setup_pool().await;
    schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();
    schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();
    schedule::create(&pool, "2024-05-01", "Siena").await.unwrap();

    let resolution = status::apply(
        &pool,
        &CallbackAction::parse("paid:2024-05-01:Sicilia").unwrap(),
    )
    .await
    .unwrap();

    // Duplicates share the natural key, so both rows resolve together.
    assert_eq!(resolution.rows_affected, 2);
    let matching = schedule::find_by_key(&pool, "2024-05-01", "Sicilia").await.unwrap();
    assert!(matching.iter().all(|e| e.status == PaidStatus::Paid));

    let other = schedule::find_by_key(&pool, "2024-05-01", "Siena").await.unwrap();
    assert_eq!(other[0].status, PaidStatus::Unresolved);
}

#[tokio::test]
async fn mismatched_callback_changes_nothing() {
    let pool = setup_pool().await;
    schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();

    let by_id = status::apply(&pool, &CallbackAction::parse("paid_id:999").unwrap())
        .await
        .unwrap();
    assert_eq!(by_id.rows_affected, 0);
    assert_eq!(by_id.message(), "No matching entry.");

    let by_key = status::apply(
        &pool,
        &CallbackAction::parse("waiting:2024-06-01:Toscana").unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(by_key.rows_affected, 0);

    let unresolved = schedule::list_unresolved(&pool).await.unwrap();
    assert_eq!(unresolved.len(), 1);
}

#[tokio::test]
async fn ids_are_assigned_in_order_and_never_reused() {
    let pool = setup_pool().await;
    let first = schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();
    let second = schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn mark_notified_flips_flag_only() {
    let pool = setup_pool().await;
    let id = schedule::create(&pool, "2024-05-01", "Sicilia").await.unwrap();
    schedule::mark_notified(&pool, id).await.unwrap();

    let all = schedule::list_all(&pool).await.unwrap();
    assert!(all[0].notified);
    assert_eq!(all[0].status, PaidStatus::Unresolved);
}
