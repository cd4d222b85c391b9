//! Conditional-write reservation of hash → URL mappings.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{InsertOutcome, LinkRepository};
use crate::domain::store_error::bounded;

/// Outcome of a single reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// The hash was free and is now bound to the URL.
    Created(Link),
    /// The store reported the hash as already taken.
    Conflict,
    /// Any other failure, including an elapsed deadline. Details are logged only.
    TransientFailure,
}

/// Reserves hashes through the store's atomic insert-if-absent.
///
/// There is no lookup before the write: two concurrent reservations of the same
/// hash resolve to exactly one [`Reservation::Created`] and one
/// [`Reservation::Conflict`], decided by the store.
pub struct UniquenessEnforcer<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    timeout: Duration,
}

impl<L: LinkRepository + ?Sized> UniquenessEnforcer<L> {
    pub fn new(repository: Arc<L>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    /// Issues one conditional write for `hash` → `url`.
    pub async fn reserve(&self, hash: &str, url: &str) -> Reservation {
        let new_link = NewLink::new(hash, url);

        match bounded(self.timeout, self.repository.insert_if_absent(new_link)).await {
            Ok(InsertOutcome::Created(link)) => {
                debug!(hash, backend = self.repository.backend(), "Link reserved");
                Reservation::Created(link)
            }
            Ok(InsertOutcome::Conflict) => {
                debug!(hash, backend = self.repository.backend(), "Hash already taken");
                Reservation::Conflict
            }
            Err(e) => {
                error!(
                    hash,
                    backend = self.repository.backend(),
                    error = %e,
                    "Conditional insert failed"
                );
                Reservation::TransientFailure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::domain::store_error::StoreError;
    use async_trait::async_trait;
    use chrono::Utc;

    fn mock_with_backend() -> MockLinkRepository {
        let mut mock = MockLinkRepository::new();
        mock.expect_backend().return_const("mock");
        mock
    }

    #[tokio::test]
    async fn test_reserve_created() {
        let mut mock = mock_with_backend();
        mock.expect_insert_if_absent()
            .withf(|new_link| new_link.hash == "abcd" && new_link.url == "https://example.com")
            .times(1)
            .returning(|new_link| Ok(InsertOutcome::Created(new_link.into_link(Utc::now()))));

        let enforcer = UniquenessEnforcer::new(Arc::new(mock), Duration::from_secs(1));
        let outcome = enforcer.reserve("abcd", "https://example.com").await;

        match outcome {
            Reservation::Created(link) => {
                assert_eq!(link.hash, "abcd");
                assert_eq!(link.url, "https://example.com");
            }
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reserve_conflict() {
        let mut mock = mock_with_backend();
        mock.expect_insert_if_absent()
            .times(1)
            .returning(|_| Ok(InsertOutcome::Conflict));

        let enforcer = UniquenessEnforcer::new(Arc::new(mock), Duration::from_secs(1));

        assert_eq!(
            enforcer.reserve("abcd", "https://example.com").await,
            Reservation::Conflict
        );
    }

    #[tokio::test]
    async fn test_reserve_store_error_is_transient() {
        let mut mock = mock_with_backend();
        mock.expect_insert_if_absent()
            .times(1)
            .returning(|_| Err(StoreError::Dynamo("connection reset".to_string())));

        let enforcer = UniquenessEnforcer::new(Arc::new(mock), Duration::from_secs(1));

        assert_eq!(
            enforcer.reserve("abcd", "https://example.com").await,
            Reservation::TransientFailure
        );
    }

    struct StalledRepository;

    #[async_trait]
    impl LinkRepository for StalledRepository {
        fn backend(&self) -> &'static str {
            "stalled"
        }

        async fn insert_if_absent(&self, _new_link: NewLink) -> Result<InsertOutcome, StoreError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(InsertOutcome::Conflict)
        }

        async fn find_by_hash(&self, _hash: &str) -> Result<Option<Link>, StoreError> {
            Ok(None)
        }

        async fn list_recent(&self, _limit: usize) -> Result<Vec<Link>, StoreError> {
            Ok(Vec::new())
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_reserve_timeout_is_transient() {
        let enforcer = UniquenessEnforcer::new(Arc::new(StalledRepository), Duration::from_millis(20));

        assert_eq!(
            enforcer.reserve("abcd", "https://example.com").await,
            Reservation::TransientFailure
        );
    }
}
