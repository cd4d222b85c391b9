//! Infrastructure layer for external integrations.
//!
//! Implements the domain's [`crate::domain::repositories::LinkRepository`]
//! contract against concrete stores.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL, DynamoDB and in-memory link stores

pub mod persistence;
