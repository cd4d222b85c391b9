//! PostgreSQL adapter tests.
//!
//! `#[sqlx::test]` creates a scratch database per test from `DATABASE_URL`.

use link_shortener::domain::entities::NewLink;
use link_shortener::domain::repositories::{InsertOutcome, LinkRepository};
use link_shortener::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
async fn test_insert_and_find(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let outcome = repo
        .insert_if_absent(NewLink::new("test", "https://example.com"))
        .await
        .unwrap();
    let InsertOutcome::Created(created) = outcome else {
        panic!("expected Created");
    };
    assert_eq!(created.hash, "test");
    assert_eq!(created.url, "https://example.com");

    let found = repo.find_by_hash("test").await.unwrap().unwrap();
    assert_eq!(found, created);
}

#[sqlx::test]
async fn test_find_by_hash_not_found(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.find_by_hash("missing").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_duplicate_hash_conflicts(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    repo.insert_if_absent(NewLink::new("dup", "https://first.com"))
        .await
        .unwrap();
    let outcome = repo
        .insert_if_absent(NewLink::new("dup", "https://second.com"))
        .await
        .unwrap();

    assert_eq!(outcome, InsertOutcome::Conflict);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE hash = 'dup'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(
        repo.find_by_hash("dup").await.unwrap().unwrap().url,
        "https://first.com"
    );
}

#[sqlx::test]
async fn test_list_recent_orders_by_insertion(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    for i in 0..5 {
        repo.insert_if_absent(NewLink::new(format!("h{i}"), "https://example.com"))
            .await
            .unwrap();
    }

    let hashes: Vec<_> = repo
        .list_recent(3)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.hash)
        .collect();

    assert_eq!(hashes, vec!["h4", "h3", "h2"]);
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
