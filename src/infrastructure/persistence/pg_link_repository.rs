//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{InsertOutcome, LinkRepository};
use crate::domain::store_error::StoreError;
use crate::utils::db_error::is_unique_violation_on_hash;

/// PostgreSQL repository for link storage and retrieval.
///
/// Every query checks a connection out of the pool and returns it when the
/// query future completes or is dropped. `created_at` is assigned by the
/// column default inside the insert.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    hash: String,
    url: String,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(row.hash, row.url, row.created_at)
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert_if_absent(&self, new_link: NewLink) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO urls (hash, url)
            VALUES ($1, $2)
            RETURNING hash, url, created_at
            "#,
        )
        .bind(&new_link.hash)
        .bind(&new_link.url)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(InsertOutcome::Created(row.into())),
            Err(e) if is_unique_violation_on_hash(&e) => Ok(InsertOutcome::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, StoreError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT hash, url, created_at
            FROM urls
            WHERE hash = $1
            "#,
        )
        .bind(hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Link>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT hash, url, created_at
            FROM urls
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
