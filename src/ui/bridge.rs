// InputBridge - translates typed player input into session commands
//
// The player sees 1-based question and answer numbers; the session works with
// question ids and zero-based answer indices. The bridge learns the mapping
// from the Started event (and QuestionAvailable events) as they are rendered.

use crate::models::{Question, QuestionId};
use crate::session::{PlayerCommand, SessionEvent};
use regex::Regex;
use thiserror::Error;

/// Why a line of input could not be turned into a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Could not read '{0}'")]
    Unrecognized(String),

    #[error("There is no question {0}")]
    NoSuchQuestion(usize),

    #[error("Question {question} has no answer {answer}")]
    NoSuchAnswer { question: usize, answer: usize },
}

/// Maps displayed question numbers to question ids.
#[derive(Debug, Clone)]
pub struct InputBridge {
    // (question id, answer count) by display position; None until learned
    questions: Vec<Option<(QuestionId, usize)>>,

    /// `<question> <answer>`, separated by whitespace, comma, colon or dash
    selection_pattern: Regex,
}

impl InputBridge {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            selection_pattern: Regex::new(r"^\s*(\d+)\s*[\s,:-]\s*(\d+)\s*$")
                .expect("Invalid selection regex"),
        }
    }

    /// Learn a question as it is displayed at zero-based `position`.
    pub fn register_question(&mut self, position: usize, question: &Question) {
        if self.questions.len() <= position {
            self.questions.resize(position + 1, None);
        }
        self.questions[position] = Some((question.id.clone(), question.answers.len()));
    }

    /// Update the mapping from a session event. Other events are ignored.
    pub fn observe(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::QuestionAvailable { position, question } => {
                self.register_question(*position, question)
            }
            SessionEvent::Started { questions, .. } => {
                for (position, question) in questions.iter().enumerate() {
                    self.register_question(position, question);
                }
            }
            _ => {}
        }
    }

    /// Translate one line of input.
    pub fn translate(&self, line: &str) -> Result<PlayerCommand, InputError> {
        let captures = self
            .selection_pattern
            .captures(line)
            .ok_or_else(|| InputError::Unrecognized(line.trim().to_string()))?;

        let question: usize = captures[1]
            .parse()
            .map_err(|_| InputError::Unrecognized(line.trim().to_string()))?;
        let answer: usize = captures[2]
            .parse()
            .map_err(|_| InputError::Unrecognized(line.trim().to_string()))?;

        let (question_id, answer_count) = question
            .checked_sub(1)
            .and_then(|position| self.questions.get(position))
            .and_then(Option::as_ref)
            .ok_or(InputError::NoSuchQuestion(question))?;

        if answer == 0 || answer > *answer_count {
            return Err(InputError::NoSuchAnswer { question, answer });
        }

        Ok(PlayerCommand::Select {
            question_id: question_id.clone(),
            answer_index: answer - 1,
        })
    }
}

impl Default for InputBridge {
    fn default() -> Self {
        Self::new()
    }
}
