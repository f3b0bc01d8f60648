// Trivia Clock - timed multiple-choice trivia sessions
//
// This is the library crate containing the session engine: countdown timer,
// answer registry, session controller and scoring. The binary crate (main.rs)
// provides the console front-end.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod scoring;
pub mod services;
pub mod session;
pub mod timer;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use error::{ProviderError, SelectionError, SessionError};
pub use models::{Answer, Question, QuestionId, QuizSettings, RawQuestion, Tally};
pub use registry::{AnswerRegistry, Selection};
pub use services::{FileProvider, QuestionProvider, StaticProvider};
pub use session::{
    PlayerCommand, QuizSession, SessionEvent, SessionPhase, SessionRunner, SessionSettings,
};
pub use timer::{CountdownTimer, TickOutcome, TimerState};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
