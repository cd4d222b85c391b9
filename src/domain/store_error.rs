//! Failures reported by link store adapters.

use std::future::Future;
use std::time::Duration;

/// A store operation failed for a reason other than a hash conflict.
///
/// Conflicts are not errors: adapters report them as
/// [`crate::domain::repositories::InsertOutcome::Conflict`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("dynamodb error: {0}")]
    Dynamo(String),

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed record: {0}")]
    Corrupt(String),
}

/// Runs a store operation under a deadline.
///
/// An elapsed deadline becomes [`StoreError::Timeout`]; the in-flight future is
/// dropped, which releases any pooled connection it held.
pub async fn bounded<T, F>(limit: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through_result() {
        let result = bounded(Duration::from_millis(100), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let result = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, StoreError>(())
        })
        .await;

        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }
}
