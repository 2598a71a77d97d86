//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced campaign does not exist.
    #[error("campaign not found: {0}")]
    CampaignNotFound(Uuid),

    /// The requested state transition is not legal right now,
    /// e.g. closing a round when none is open.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A request field failed validation. Never reaches persistence.
    #[error("validation error on `{field}`: {message}")]
    Validation {
        /// The offending request field.
        field: &'static str,
        /// Human-readable description of the problem.
        message: String,
    },

    /// A write lost a uniqueness race (duplicate open round, duplicate
    /// turn number, duplicate history append) and retries are exhausted.
    #[error("write conflict: {0}")]
    Conflict(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for a [`DomainError::Validation`] on a named field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
