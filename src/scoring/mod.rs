// Scoring engine
//
// Pure function from the question set and the final selections to a tally.

use crate::models::{Question, Tally};
use crate::registry::{AnswerRegistry, Selection};

/// Score every question in `questions` against `selections`.
///
/// Each question lands in exactly one bucket: no selection is unanswered, a
/// selection flagged correct is correct, any other selection is incorrect.
/// Selections for questions outside `questions` are not counted.
pub fn score(questions: &[Question], selections: &AnswerRegistry) -> Tally {
    questions
        .iter()
        .fold(Tally::default(), |mut tally, question| {
            match selections.get(&question.id) {
                Selection::Unanswered => tally.unanswered += 1,
                Selection::Answered(answer) if answer.correct => tally.correct += 1,
                Selection::Answered(_) => tally.incorrect += 1,
            }
            tally
        })
}
