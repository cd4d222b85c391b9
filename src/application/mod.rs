//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] capability
//! and expose the create / resolve / list operations to HTTP handlers and the
//! admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, resolution and listing

pub mod services;
