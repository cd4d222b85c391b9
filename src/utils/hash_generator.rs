//! Short hash generation and custom hash validation.
//!
//! Generated hashes are drawn uniformly from a 64-symbol URL-safe alphabet using
//! the thread-local CSPRNG, so consecutive hashes are unrelated and cannot be
//! enumerated by counting. The generator never consults the store; collisions
//! are detected by [`crate::domain::reservation::UniquenessEnforcer`].

use rand::Rng;

use crate::error::AppError;

/// URL-safe alphabet: digits, lowercase, uppercase, `-` and `_`.
pub const HASH_ALPHABET: &[u8; 64] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ-_";

/// Length of system-generated hashes unless configured otherwise.
pub const DEFAULT_HASH_LENGTH: usize = 4;

/// Longest hash any backend accepts (`urls.hash` is `VARCHAR(64)`).
pub const MAX_HASH_LENGTH: usize = 64;

/// Generates a random hash of exactly `length` characters.
///
/// # Examples
///
/// ```ignore
/// let hash = generate_hash(4);
/// assert_eq!(hash.len(), 4);
/// ```
pub fn generate_hash(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| HASH_ALPHABET[rng.random_range(0..HASH_ALPHABET.len())] as char)
        .collect()
}

/// Validates a caller-supplied hash.
///
/// Custom hashes are used verbatim: any non-empty string up to
/// [`MAX_HASH_LENGTH`] characters is accepted.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] if the hash is empty or too long.
pub fn validate_custom_hash(hash: &str) -> Result<(), AppError> {
    if hash.is_empty() {
        return Err(AppError::bad_request("Validation error: ID must not be empty"));
    }

    if hash.chars().count() > MAX_HASH_LENGTH {
        return Err(AppError::bad_request(format!(
            "Validation error: ID must be at most {MAX_HASH_LENGTH} characters"
        )));
    }

    Ok(())
}
