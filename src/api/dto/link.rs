//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Body of `POST /links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Target URL. Web-URI rules are enforced by the service so that every
    /// entry point shares them.
    pub url: String,

    /// Optional custom hash, used verbatim.
    #[validate(length(min = 1, max = 64, message = "ID must be between 1 and 64 characters"))]
    pub id: Option<String>,
}

/// Wire representation of a link.
///
/// ```json
/// { "id": "aZ3_", "url": "https://example.com", "createdAt": "2024-05-01T12:30:00.123Z" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.hash,
            url: link.url,
            created_at: link.created_at,
        }
    }
}
