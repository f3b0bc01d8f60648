// Answer registry
//
// Keyed store of the player's current selection per question. A new selection
// for a question replaces the old one; no history is kept. Once frozen the
// registry ignores further selections.

use crate::models::{Answer, QuestionId};
use indexmap::IndexMap;

/// Current selection for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Answered(&'a Answer),
    Unanswered,
}

impl<'a> Selection<'a> {
    pub fn answer(&self) -> Option<&'a Answer> {
        match self {
            Selection::Answered(answer) => Some(answer),
            Selection::Unanswered => None,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Selection::Answered(_))
    }
}

/// Per-question record of the player's selected answer.
///
/// Holds at most one entry per [`QuestionId`]. Selection order is preserved so
/// [`answered_question_ids`](Self::answered_question_ids) lists questions in the
/// order they were first answered.
#[derive(Debug, Clone, Default)]
pub struct AnswerRegistry {
    selections: IndexMap<QuestionId, Answer>,
    frozen: bool,
}

impl AnswerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `answer` as the selection for `question_id`, replacing any prior one.
    ///
    /// Returns `false` (and changes nothing) once the registry is frozen.
    pub fn select(&mut self, question_id: QuestionId, answer: Answer) -> bool {
        if self.frozen {
            tracing::debug!("Registry frozen, selection for {} ignored", question_id);
            return false;
        }

        if let Some(previous) = self.selections.insert(question_id, answer) {
            tracing::trace!("Replaced selection '{}'", previous.text);
        }

        true
    }

    pub fn get(&self, question_id: &QuestionId) -> Selection<'_> {
        match self.selections.get(question_id) {
            Some(answer) => Selection::Answered(answer),
            None => Selection::Unanswered,
        }
    }

    /// Identifiers of every question with a selection.
    ///
    /// Each call iterates the registry as it is at that moment.
    pub fn answered_question_ids(&self) -> impl Iterator<Item = &QuestionId> + '_ {
        self.selections.keys()
    }

    /// Number of questions with a selection.
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Make the registry read-only for the rest of its life.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
