//! Mapping from `sqlx` errors onto the domain error taxonomy.

use fategm_core::error::DomainError;

/// Wraps any storage failure as an infrastructure error.
pub(crate) fn storage_error(e: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(format!("database error: {e}"))
}

/// Like [`storage_error`], but turns unique-index violations into
/// `Conflict` so callers can distinguish a lost write race from a broken
/// database.
pub(crate) fn write_error(context: &str, e: sqlx::Error) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict(context.to_owned())
        }
        _ => storage_error(e),
    }
}
