//! In-process link store.
//!
//! Backs tests and `STORE_BACKEND=memory` local runs. Insert-if-absent checks
//! and writes under one lock, so it gives the same single-winner guarantee as
//! the real stores.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{InsertOutcome, LinkRepository};
use crate::domain::store_error::StoreError;

#[derive(Default)]
struct Inner {
    by_hash: HashMap<String, Link>,
    /// Hashes in insertion order.
    order: Vec<String>,
}

/// Link store held in process memory.
#[derive(Default)]
pub struct MemoryLinkRepository {
    inner: Mutex<Inner>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert_if_absent(&self, new_link: NewLink) -> Result<InsertOutcome, StoreError> {
        let mut inner = self.inner.lock().await;

        if inner.by_hash.contains_key(&new_link.hash) {
            return Ok(InsertOutcome::Conflict);
        }

        let link = new_link.into_link(Utc::now());
        inner.order.push(link.hash.clone());
        inner.by_hash.insert(link.hash.clone(), link.clone());

        Ok(InsertOutcome::Created(link))
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, StoreError> {
        Ok(self.inner.lock().await.by_hash.get(hash).cloned())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Link>, StoreError> {
        let inner = self.inner.lock().await;

        inner
            .order
            .iter()
            .rev()
            .take(limit)
            .map(|hash| {
                inner
                    .by_hash
                    .get(hash)
                    .cloned()
                    .ok_or_else(|| StoreError::Corrupt(format!("index entry without link: {hash}")))
            })
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
