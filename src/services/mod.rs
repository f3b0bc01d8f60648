//! Question providers.
//!
//! The session engine consumes questions through the [`QuestionProvider`]
//! trait and never cares where they come from. Two providers ship with the
//! crate:
//!
//! - [`FileProvider`]: reads a YAML or JSON question document from disk
//! - [`StaticProvider`]: serves a fixed list (or a fixed failure) from memory
//!
//! Providers return raw records; validation happens at the session boundary
//! (see [`crate::models::validate_questions`]).

pub mod provider;

pub use provider::{FileProvider, QuestionProvider, StaticProvider, parse_question_document};
