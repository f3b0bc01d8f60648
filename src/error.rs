//! Library error types.

use crate::models::QuestionId;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised by a question provider.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("Failed to read question file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse question file {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    #[error("Question source unavailable: {0}")]
    Unavailable(String),
}

/// Why a player selection was not recorded.
///
/// None of these are fatal; the session state is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("Session is not accepting answers")]
    NotInProgress,

    #[error("Question {0} is not part of this session")]
    InvalidSelectionTarget(QuestionId),

    #[error("Question {question_id} has no answer at position {index}")]
    UnknownAnswer { question_id: QuestionId, index: usize },

    #[error("Session has expired, selection for question {0} ignored")]
    PostExpirySelection(QuestionId),
}

/// Errors that end a session without a tally.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("Could not load questions: {0}")]
    ProviderFetchFailure(#[from] ProviderError),

    #[error("Session has already left the loading phase")]
    AlreadyLoaded,

    /// The session handed to a runner had already failed to load.
    #[error("Session failed to load questions: {0}")]
    LoadFailed(String),
}
