//! Utility functions for hash generation, URL validation and store error
//! inspection.
//!
//! - [`hash_generator`] - Random short hash generation and custom hash checks
//! - [`url_validator`] - Web URL validation
//! - [`db_error`] - PostgreSQL constraint-violation detection

pub mod db_error;
pub mod hash_generator;
pub mod url_validator;
