//! Error types for address sanitization.

use thiserror::Error;

/// Result type alias for sanitization operations.
pub type Result<T> = std::result::Result<T, SanitizeError>;

/// Errors that occur when an address cannot be reduced to a safe form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SanitizeError {
    /// Input was empty before cleanup even started
    #[error("Address must be a non-empty string")]
    Empty,

    /// Cleanup removed so much that nothing usable remains
    #[error("Address becomes too short after sanitization")]
    TooShort,

    /// Input exceeds the length bound even after cleanup
    #[error("Address is too long even after sanitization")]
    TooLong,
}
