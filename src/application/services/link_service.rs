//! Link creation, resolution and listing service.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::domain::reservation::{Reservation, UniquenessEnforcer};
use crate::domain::store_error::{StoreError, bounded};
use crate::error::AppError;
use crate::utils::hash_generator::{DEFAULT_HASH_LENGTH, generate_hash, validate_custom_hash};
use crate::utils::url_validator::validate_web_url;

/// Number of links returned by [`LinkService::list_links`].
pub const LIST_PAGE_SIZE: usize = 30;

/// Tunables for [`LinkService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Length of system-generated hashes.
    pub hash_length: usize,
    /// Extra fresh hashes drawn after a generated hash collides. `0` reports
    /// the first collision to the caller as retryable.
    pub collision_retries: u32,
    /// Deadline applied to every store call.
    pub store_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
            collision_retries: 0,
            store_timeout: Duration::from_secs(1),
        }
    }
}

/// Service for creating and retrieving short links.
///
/// Holds no mutable state of its own: concurrent requests coordinate only
/// through the store's conditional write.
pub struct LinkService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    enforcer: UniquenessEnforcer<L>,
    settings: ServiceSettings,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service over a store.
    pub fn new(repository: Arc<L>, settings: ServiceSettings) -> Self {
        Self {
            enforcer: UniquenessEnforcer::new(repository.clone(), settings.store_timeout),
            repository,
            settings,
        }
    }

    /// Name of the backing store.
    pub fn backend(&self) -> &'static str {
        self.repository.backend()
    }

    /// Creates a short link.
    ///
    /// With `custom_hash` the caller's identifier is reserved verbatim;
    /// otherwise a random hash of the configured length is generated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if:
    /// - `url` is not an absolute http/https URL
    /// - the custom hash is empty, too long, or already in use
    ///
    /// Returns [`AppError::ServiceUnavailable`] if every generated hash
    /// collided; the caller should retry.
    ///
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn create_link(
        &self,
        url: String,
        custom_hash: Option<String>,
    ) -> Result<Link, AppError> {
        if let Err(e) = validate_web_url(&url) {
            return Err(AppError::bad_request(format!(
                "Validation error: not a valid URL: {url} ({e})"
            )));
        }

        match custom_hash {
            Some(hash) => self.create_with_custom_hash(url, hash).await,
            None => self.create_with_generated_hash(url).await,
        }
    }

    async fn create_with_custom_hash(&self, url: String, hash: String) -> Result<Link, AppError> {
        validate_custom_hash(&hash)?;

        match self.enforcer.reserve(&hash, &url).await {
            Reservation::Created(link) => {
                info!(hash = %link.hash, "Link created with custom hash");
                Ok(link)
            }
            Reservation::Conflict => Err(AppError::bad_request(format!(
                "Validation error: ID already used: {hash}"
            ))),
            Reservation::TransientFailure => Err(AppError::internal("Failed to store link")),
        }
    }

    /// Reserves a generated hash, drawing at most `collision_retries + 1`.
    async fn create_with_generated_hash(&self, url: String) -> Result<Link, AppError> {
        let attempts = self.settings.collision_retries + 1;

        for attempt in 1..=attempts {
            let hash = generate_hash(self.settings.hash_length);

            match self.enforcer.reserve(&hash, &url).await {
                Reservation::Created(link) => {
                    info!(hash = %link.hash, attempt, "Link created");
                    return Ok(link);
                }
                Reservation::Conflict => {
                    warn!(hash = %hash, attempt, attempts, "Generated hash collided");
                }
                Reservation::TransientFailure => {
                    return Err(AppError::internal("Failed to store link"));
                }
            }
        }

        Err(AppError::service_unavailable(
            "Service temporarily unavailable, please try again.",
        ))
    }

    /// Resolves a hash to its link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if `hash` is empty.
    /// Returns [`AppError::NotFound`] if no link has this hash.
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn get_link(&self, hash: &str) -> Result<Link, AppError> {
        if hash.is_empty() {
            return Err(AppError::bad_request("Invalid ID passed"));
        }

        bounded(self.settings.store_timeout, self.repository.find_by_hash(hash))
            .await
            .map_err(|e| {
                error!(hash, error = %e, "Link lookup failed");
                AppError::internal("Failed to load link")
            })?
            .ok_or_else(|| AppError::not_found(format!("Link not found with short ID: {hash}")))
    }

    /// Returns the [`LIST_PAGE_SIZE`] most recent links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        bounded(
            self.settings.store_timeout,
            self.repository.list_recent(LIST_PAGE_SIZE),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "Listing links failed");
            AppError::internal("Failed to list links")
        })
    }

    /// Probes the store within the configured deadline.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] if the store is unreachable.
    pub async fn check_store(&self) -> Result<(), StoreError> {
        bounded(self.settings.store_timeout, self.repository.ping()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewLink;
    use crate::domain::repositories::{InsertOutcome, MockLinkRepository};
    use chrono::Utc;

    fn mock_repo() -> MockLinkRepository {
        let mut mock = MockLinkRepository::new();
        mock.expect_backend().return_const("mock");
        mock
    }

    fn created(new_link: NewLink) -> Result<InsertOutcome, StoreError> {
        Ok(InsertOutcome::Created(new_link.into_link(Utc::now())))
    }

    fn service(mock: MockLinkRepository, settings: ServiceSettings) -> LinkService<MockLinkRepository> {
        LinkService::new(Arc::new(mock), settings)
    }

    #[tokio::test]
    async fn test_create_link_generates_default_length_hash() {
        let mut mock = mock_repo();
        mock.expect_insert_if_absent()
            .withf(|new_link| new_link.hash.len() == 4 && new_link.url == "https://example.com")
            .times(1)
            .returning(created);

        let link = service(mock, ServiceSettings::default())
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.hash.len(), 4);
        assert_eq!(link.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_create_link_uses_configured_length() {
        let mut mock = mock_repo();
        mock.expect_insert_if_absent()
            .withf(|new_link| new_link.hash.len() == 10)
            .times(1)
            .returning(created);

        let settings = ServiceSettings {
            hash_length: 10,
            ..ServiceSettings::default()
        };
        let link = service(mock, settings)
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.hash.len(), 10);
    }

    #[tokio::test]
    async fn test_create_link_invalid_url_never_touches_store() {
        let mut mock = mock_repo();
        mock.expect_insert_if_absent().times(0);

        let result = service(mock, ServiceSettings::default())
            .create_link("example.com".to_string(), None)
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().starts_with("Bad Request: Validation error: not a valid URL"));
    }

    #[tokio::test]
    async fn test_create_link_with_custom_hash() {
        let mut mock = mock_repo();
        mock.expect_insert_if_absent()
            .withf(|new_link| new_link.hash == "My_Link")
            .times(1)
            .returning(created);

        let link = service(mock, ServiceSettings::default())
            .create_link("https://example.com".to_string(), Some("My_Link".to_string()))
            .await
            .unwrap();

        assert_eq!(link.hash, "My_Link");
    }

    #[tokio::test]
    async fn test_create_link_empty_custom_hash_is_rejected() {
        let mut mock = mock_repo();
        mock.expect_insert_if_absent().times(0);

        let result = service(mock, ServiceSettings::default())
            .create_link("https://example.com".to_string(), Some(String::new()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_custom_hash_conflict_is_invalid_input() {
        let mut mock = mock_repo();
        mock.expect_insert_if_absent()
            .times(1)
            .returning(|_| Ok(InsertOutcome::Conflict));

        let err = service(mock, ServiceSettings::default())
            .create_link("https://example.com".to_string(), Some("taken".to_string()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AppError::bad_request("Validation error: ID already used: taken")
        );
    }

    #[tokio::test]
    async fn test_custom_hash_conflict_is_never_retried() {
        let mut mock = mock_repo();
        mock.expect_insert_if_absent()
            .times(1)
            .returning(|_| Ok(InsertOutcome::Conflict));

        let settings = ServiceSettings {
            collision_retries: 5,
            ..ServiceSettings::default()
        };
        let result = service(mock, settings)
            .create_link("https://example.com".to_string(), Some("taken".to_string()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_generated_hash_conflict_is_service_unavailable() {
        let mut mock = mock_repo();
        mock.expect_insert_if_absent()
            .times(1)
            .returning(|_| Ok(InsertOutcome::Conflict));

        let err = service(mock, ServiceSettings::default())
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_generated_hash_retries_are_bounded() {
        let mut mock = mock_repo();
        mock.expect_insert_if_absent()
            .times(3)
            .returning(|_| Ok(InsertOutcome::Conflict));

        let settings = ServiceSettings {
            collision_retries: 2,
            ..ServiceSettings::default()
        };
        let err = service(mock, settings)
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_generated_hash_retry_succeeds_with_fresh_hash() {
        let mut mock = mock_repo();
        let mut seq = mockall::Sequence::new();
        mock.expect_insert_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(InsertOutcome::Conflict));
        mock.expect_insert_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(created);

        let settings = ServiceSettings {
            collision_retries: 1,
            ..ServiceSettings::default()
        };
        let link = service(mock, settings)
            .create_link("https://example.com".to_string(), None)
            .await
            .unwrap();

        assert_eq!(link.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_store_failure_on_create_is_internal() {
        let mut mock = mock_repo();
        mock.expect_insert_if_absent()
            .times(1)
            .returning(|_| Err(StoreError::Dynamo("ProvisionedThroughputExceeded".to_string())));

        let err = service(mock, ServiceSettings::default())
            .create_link("https://example.com".to_string(), Some("abc".to_string()))
            .await
            .unwrap_err();

        assert_eq!(err, AppError::internal("Failed to store link"));
        assert!(!err.to_string().contains("Provisioned"));
    }

    #[tokio::test]
    async fn test_get_link_found() {
        let now = Utc::now();
        let mut mock = mock_repo();
        mock.expect_find_by_hash()
            .withf(|hash| hash == "abcd")
            .times(1)
            .returning(move |hash| {
                Ok(Some(Link::new(
                    hash.to_string(),
                    "https://example.com".to_string(),
                    now,
                )))
            });

        let link = service(mock, ServiceSettings::default())
            .get_link("abcd")
            .await
            .unwrap();

        assert_eq!(link.hash, "abcd");
        assert_eq!(link.created_at, now);
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut mock = mock_repo();
        mock.expect_find_by_hash().times(1).returning(|_| Ok(None));

        let err = service(mock, ServiceSettings::default())
            .get_link("doesnotexist")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AppError::not_found("Link not found with short ID: doesnotexist")
        );
    }

    #[tokio::test]
    async fn test_get_link_empty_id_is_invalid_input() {
        let mut mock = mock_repo();
        mock.expect_find_by_hash().times(0);

        let err = service(mock, ServiceSettings::default())
            .get_link("")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_get_link_store_failure_is_internal() {
        let mut mock = mock_repo();
        mock.expect_find_by_hash()
            .times(1)
            .returning(|_| Err(StoreError::Corrupt("missing url".to_string())));

        let err = service(mock, ServiceSettings::default())
            .get_link("abcd")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_list_links_requests_fixed_page() {
        let mut mock = mock_repo();
        mock.expect_list_recent()
            .withf(|limit| *limit == LIST_PAGE_SIZE)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let links = service(mock, ServiceSettings::default())
            .list_links()
            .await
            .unwrap();

        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_list_links_store_failure_is_internal() {
        let mut mock = mock_repo();
        mock.expect_list_recent()
            .times(1)
            .returning(|_| Err(StoreError::Timeout(Duration::from_secs(1))));

        let err = service(mock, ServiceSettings::default())
            .list_links()
            .await
            .unwrap_err();

        assert_eq!(err, AppError::internal("Failed to list links"));
    }
}
