//! Link store implementations.
//!
//! Every implementation realizes insert-if-absent as one atomic backend
//! operation and reports a taken hash as
//! [`crate::domain::repositories::InsertOutcome::Conflict`].
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - relational store; conflict = unique violation on `urls_hash_uniq`
//! - [`DynamoLinkRepository`] - document store; conflict = `ConditionalCheckFailedException`
//! - [`MemoryLinkRepository`] - in-process store; conflict = key present under the lock

pub mod dynamo_link_repository;
pub mod memory_link_repository;
pub mod pg_link_repository;

pub use dynamo_link_repository::DynamoLinkRepository;
pub use memory_link_repository::MemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
