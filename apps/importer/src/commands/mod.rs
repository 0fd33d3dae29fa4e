//! Commands run against the collection.

pub mod import;
pub mod note_type;
pub mod show;

pub use import::{import_text, preview_text, ImportOptions, ImportSummary};
pub use note_type::{ensure_note_type, NoteTypeStatus};
pub use show::{show_question_set, ShownNote};

use crate::db::DbError;
use crate::media::MediaError;
use arq_core::{ImportError, ParseError};
use thiserror::Error;

/// Errors reported to the user.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("a title is required for the question set")]
    MissingTitle,

    #[error("a question set titled {0:?} already exists; declare how many questions were imported before or use another title")]
    DuplicateTitle(String),

    #[error("nothing to import: the text is empty")]
    NothingToImport,

    #[error("no question set titled {0:?} in the collection")]
    UnknownTitle(String),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ParseError> for CommandError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::EmptyInput => Self::NothingToImport,
        }
    }
}
