//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::domain::store_error::StoreError;
use async_trait::async_trait;

/// Result of a conditional insert.
///
/// `Conflict` is the named signal each adapter derives once from its backend
/// (a constraint name, a conditional-check exception). Callers never inspect
/// error text to detect a taken hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Created(Link),
    Conflict,
}

/// Storage capability shared by all link backends.
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Short backend name used in logs and health output.
    fn backend(&self) -> &'static str;

    /// Inserts the link only if no link with the same hash exists.
    ///
    /// Must be a single atomic operation in the backend. Returns
    /// [`InsertOutcome::Conflict`] when the hash is taken.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] for every failure other than a hash conflict.
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<InsertOutcome, StoreError>;

    /// Point lookup by hash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failures.
    async fn find_by_hash(&self, hash: &str) -> Result<Option<Link>, StoreError>;

    /// Most recent links, newest first, at most `limit` items.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failures.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Link>, StoreError>;

    /// Cheap reachability probe.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be reached.
    async fn ping(&self) -> Result<(), StoreError>;
}
