//! HTTP middleware for request processing.
//!
//! Provides request tracing and CORS headers.

pub mod cors;
pub mod tracing;
