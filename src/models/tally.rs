use serde::{Deserialize, Serialize};
use std::fmt;

/// Final count of a scored session.
///
/// `correct + incorrect + unanswered` always equals the number of questions
/// the session was scored over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
}

impl Tally {
    pub fn new(correct: usize, incorrect: usize, unanswered: usize) -> Self {
        Self {
            correct,
            incorrect,
            unanswered,
        }
    }

    /// Number of questions the tally covers.
    pub fn total(&self) -> usize {
        self.correct + self.incorrect + self.unanswered
    }

    /// Number of questions that had a selection when the clock ran out.
    pub fn answered(&self) -> usize {
        self.correct + self.incorrect
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} correct, {} incorrect, {} unanswered",
            self.correct, self.incorrect, self.unanswered
        )
    }
}
