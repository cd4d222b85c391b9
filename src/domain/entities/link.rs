//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A persisted short link.
///
/// Links are immutable once created: there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub hash: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    pub fn new(hash: String, url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            hash,
            url,
            created_at,
        }
    }
}

/// Input data for reserving a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub hash: String,
    pub url: String,
}

impl NewLink {
    pub fn new(hash: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            url: url.into(),
        }
    }

    /// Materializes the record with the timestamp assigned by the store.
    pub fn into_link(self, created_at: DateTime<Utc>) -> Link {
        Link::new(self.hash, self.url, created_at)
    }
}
