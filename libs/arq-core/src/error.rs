//! Error types for arq-core.

use thiserror::Error;

/// Result type alias using ImportError.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Errors that can occur while normalizing pasted text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("input contains no non-blank lines")]
    EmptyInput,
}

/// Errors that can occur while turning records into notes.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("field {field} not found in note type {note_type}")]
    MissingField { field: String, note_type: String },

    #[error("{declared} questions declared as previously imported, but only {parsed} were parsed")]
    PreviousCountExceeds { declared: usize, parsed: usize },

    #[error("note type {name} is at version {found}, expected {expected}")]
    OutdatedNoteType {
        name: String,
        found: String,
        expected: String,
    },

    #[error("upgrade from {from} to {to} failed: {reason}")]
    UpgradeFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("media error: {0}")]
    Media(String),
}
