//! PostgreSQL error inspection.

/// Name of the unique constraint guarding `urls.hash`.
pub const HASH_UNIQUE_CONSTRAINT: &str = "urls_hash_uniq";

/// Returns true if `e` is a unique violation on the hash constraint.
///
/// Violations of any other constraint are not hash conflicts and stay errors.
pub fn is_unique_violation_on_hash(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(HASH_UNIQUE_CONSTRAINT))
}
