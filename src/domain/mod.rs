//! Domain layer: the link entity, the store contract and the reservation
//! protocol that keeps hashes unique.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Store contract implemented by the infrastructure layer
//! - [`reservation`] - Conditional-write protocol classifying insert outcomes
//! - [`store_error`] - Failures reported by store adapters
//!
//! # Create Flow
//!
//! 1. HTTP handler validates the payload
//! 2. [`crate::application::services::LinkService`] picks a custom or generated hash
//! 3. [`reservation::UniquenessEnforcer`] issues one conditional insert
//! 4. The [`reservation::Reservation`] outcome is mapped onto [`crate::error::AppError`]

pub mod entities;
pub mod repositories;
pub mod reservation;
pub mod store_error;
