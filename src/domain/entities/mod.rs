//! Core domain entities.
//!
//! - [`Link`] - A persisted hash → URL mapping
//! - [`NewLink`] - Input for the conditional insert; the store assigns `created_at`

pub mod link;

pub use link::{Link, NewLink};
