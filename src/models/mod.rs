//! Data models for the trivia engine.
//!
//! - [`Question`], [`Answer`], [`QuestionId`]: validated quiz content
//! - [`RawQuestion`] and friends: provider records before validation
//! - [`Tally`]: the result of a scored session
//! - [`QuizSettings`]: settings loaded from `Quiz Settings.yaml`
//!
//! Everything here is plain data. Behaviour lives in the timer, registry,
//! scoring and session modules.

pub mod config;
pub mod question;
pub mod tally;

pub use config::{QuizSettings, SettingsFile};
pub use question::{
    Answer, CorrectFlag, DataQualityIssue, DataQualityWarning, Question, QuestionDocument,
    QuestionId, QuestionSet, RawAnswer, RawAnswers, RawId, RawQuestion, validate_questions,
};
pub use tally::Tally;
