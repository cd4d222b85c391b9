//! Repository trait definitions for the domain layer.
//!
//! [`LinkRepository`] is the single capability every store backend offers.
//! Implementations live in `crate::infrastructure::persistence`:
//!
//! - `PgLinkRepository` - relational store (PostgreSQL)
//! - `DynamoLinkRepository` - document store (DynamoDB)
//! - `MemoryLinkRepository` - in-process store for tests and local runs
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod link_repository;

pub use link_repository::{InsertOutcome, LinkRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
