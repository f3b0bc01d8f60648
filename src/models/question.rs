//! Question and answer types, plus validation of raw provider records.
//!
//! Providers hand the engine [`RawQuestion`] records that mirror whatever the
//! question feed looks like on the wire. [`validate_questions`] turns them into
//! [`Question`] values the engine can trust:
//! - every question gets a unique, stable [`QuestionId`]
//! - at most one answer per question is flagged correct
//! - anything that had to be repaired is reported as a [`DataQualityWarning`]
//!
//! Validation never fails. Malformed data degrades: a question with no correct
//! answer simply cannot be answered correctly, and a question with several
//! correct answers keeps only the first one.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Opaque question identifier, stable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier assigned to the question at `index` when the feed has none.
    pub fn positional(index: usize) -> Self {
        Self(format!("q{}", index + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for QuestionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub correct: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
        }
    }
}

/// A validated multiple-choice question.
///
/// Answer order is display order only; scoring looks at the correctness flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub answers: Vec<Answer>,
}

impl Question {
    pub fn new(id: impl Into<QuestionId>, prompt: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            answers,
        }
    }

    /// Answer at the given zero-based position, if any.
    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index)
    }

    /// The answer flagged correct, if the question has one.
    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.correct)
    }
}

// ---------------------------------------------------------------------------
// Raw provider records
// ---------------------------------------------------------------------------

/// Identifier as written in a question feed. Feeds use both strings and numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Number(n) => write!(f, "{}", n),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

/// Correctness flag as written in a question feed.
///
/// The trivia feed this format comes from marks the correct answer with
/// `correct: 1`; hand-written files tend to use booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectFlag {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl CorrectFlag {
    pub fn is_set(&self) -> bool {
        match self {
            CorrectFlag::Bool(flag) => *flag,
            CorrectFlag::Number(n) => *n == 1,
            CorrectFlag::Text(s) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    #[serde(alias = "text")]
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<CorrectFlag>,
}

impl RawAnswer {
    pub fn new(value: impl Into<String>, correct: bool) -> Self {
        Self {
            value: value.into(),
            correct: Some(CorrectFlag::Bool(correct)),
        }
    }

    /// An answer whose record carries no correctness flag at all.
    pub fn unflagged(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            correct: None,
        }
    }

    fn is_flagged_correct(&self) -> bool {
        self.correct.as_ref().is_some_and(CorrectFlag::is_set)
    }
}

/// Answer list, either plain or wrapped as `{ a: [...] }` like the trivia feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswers {
    List(Vec<RawAnswer>),
    Wrapped { a: Vec<RawAnswer> },
}

impl Default for RawAnswers {
    fn default() -> Self {
        RawAnswers::List(Vec::new())
    }
}

impl RawAnswers {
    pub fn into_vec(self) -> Vec<RawAnswer> {
        match self {
            RawAnswers::List(answers) | RawAnswers::Wrapped { a: answers } => answers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RawId>,

    pub text: String,

    #[serde(default)]
    pub answers: RawAnswers,
}

impl RawQuestion {
    pub fn new(text: impl Into<String>, answers: Vec<RawAnswer>) -> Self {
        Self {
            id: None,
            text: text.into(),
            answers: RawAnswers::List(answers),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(RawId::Text(id.into()));
        self
    }
}

/// Top-level question document. The trivia feed calls the list `question`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDocument {
    #[serde(alias = "question", default)]
    pub questions: Vec<RawQuestion>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// What was wrong with a question's data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataQualityIssue {
    /// No answer is flagged correct; nothing can score as correct.
    NoCorrectAnswer,

    /// Several answers are flagged correct; only the first one counts.
    MultipleCorrectAnswers { flagged: usize },

    /// The feed reused an identifier; the question got a positional one.
    DuplicateId { original: String },

    /// The feed gave a blank identifier; the question got a positional one.
    BlankId,
}

impl fmt::Display for DataQualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityIssue::NoCorrectAnswer => f.write_str("no answer is marked correct"),
            DataQualityIssue::MultipleCorrectAnswers { flagged } => write!(
                f,
                "{} answers are marked correct, only the first one counts",
                flagged
            ),
            DataQualityIssue::DuplicateId { original } => {
                write!(f, "identifier '{}' is used more than once", original)
            }
            DataQualityIssue::BlankId => f.write_str("identifier is blank"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataQualityWarning {
    pub question_id: QuestionId,
    pub issue: DataQualityIssue,
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "question {}: {}", self.question_id, self.issue)
    }
}

/// Validated questions in feed order, with everything that had to be repaired.
///
/// Only [`validate_questions`] builds a non-empty set, so every set holds
/// unique identifiers and at most one correct answer per question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
    warnings: Vec<DataQualityWarning>,
}

impl QuestionSet {
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Vec<Question>, Vec<DataQualityWarning>) {
        (self.questions, self.warnings)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Validate raw provider records into a [`QuestionSet`].
pub fn validate_questions(raw: Vec<RawQuestion>) -> QuestionSet {
    let mut seen: HashSet<QuestionId> = HashSet::with_capacity(raw.len());
    let mut set = QuestionSet::default();

    for (index, record) in raw.into_iter().enumerate() {
        let id = match record.id {
            Some(RawId::Text(text)) if text.trim().is_empty() => {
                let id = unique_positional_id(index, &seen);
                set.warnings.push(DataQualityWarning {
                    question_id: id.clone(),
                    issue: DataQualityIssue::BlankId,
                });
                id
            }
            Some(raw_id) => {
                let candidate = QuestionId::new(raw_id.to_string());
                if seen.contains(&candidate) {
                    let id = unique_positional_id(index, &seen);
                    set.warnings.push(DataQualityWarning {
                        question_id: id.clone(),
                        issue: DataQualityIssue::DuplicateId {
                            original: candidate.to_string(),
                        },
                    });
                    id
                } else {
                    candidate
                }
            }
            None => unique_positional_id(index, &seen),
        };
        seen.insert(id.clone());

        let raw_answers = record.answers.into_vec();
        let flagged = raw_answers
            .iter()
            .filter(|answer| answer.is_flagged_correct())
            .count();

        match flagged {
            0 => set.warnings.push(DataQualityWarning {
                question_id: id.clone(),
                issue: DataQualityIssue::NoCorrectAnswer,
            }),
            1 => {}
            flagged => set.warnings.push(DataQualityWarning {
                question_id: id.clone(),
                issue: DataQualityIssue::MultipleCorrectAnswers { flagged },
            }),
        }

        let mut correct_taken = false;
        let answers = raw_answers
            .into_iter()
            .map(|answer| {
                let correct = answer.is_flagged_correct() && !correct_taken;
                correct_taken |= correct;
                Answer::new(answer.value, correct)
            })
            .collect();

        set.questions.push(Question::new(id, record.text, answers));
    }

    for warning in &set.warnings {
        tracing::warn!("Question data repaired: {}", warning);
    }

    set
}

fn unique_positional_id(index: usize, seen: &HashSet<QuestionId>) -> QuestionId {
    let base = QuestionId::positional(index);
    if !seen.contains(&base) {
        return base;
    }

    (2..)
        .map(|suffix| QuestionId::new(format!("{}-{}", base, suffix)))
        .find(|id| !seen.contains(id))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_answers(correct: [bool; 3]) -> Vec<RawAnswer> {
        vec![
            RawAnswer::new("Abbey Road", correct[0]),
            RawAnswer::new("Revolver", correct[1]),
            RawAnswer::new("Help!", correct[2]),
        ]
    }

    #[test]
    fn test_positional_ids_assigned() {
        let set = validate_questions(vec![
            RawQuestion::new("First?", three_answers([true, false, false])),
            RawQuestion::new("Second?", three_answers([false, true, false])),
        ]);

        assert_eq!(set.questions[0].id, QuestionId::from("q1"));
        assert_eq!(set.questions[1].id, QuestionId::from("q2"));
        assert!(set.warnings.is_empty());
    }

    #[test]
    fn test_explicit_ids_kept() {
        let set = validate_questions(vec![
            RawQuestion::new("Which album?", three_answers([true, false, false])).with_id("album-1"),
        ]);

        assert_eq!(set.questions[0].id.as_str(), "album-1");
    }

    #[test]
    fn test_multiple_correct_keeps_first() {
        let set = validate_questions(vec![RawQuestion::new(
            "Which album?",
            three_answers([false, true, true]),
        )]);

        let question = &set.questions[0];
        assert!(!question.answers[0].correct);
        assert!(question.answers[1].correct);
        assert!(!question.answers[2].correct);
        assert_eq!(
            set.warnings[0].issue,
            DataQualityIssue::MultipleCorrectAnswers { flagged: 2 }
        );
    }

    #[test]
    fn test_no_correct_answer_is_not_fabricated() {
        let set = validate_questions(vec![RawQuestion::new(
            "Which album?",
            vec![RawAnswer::unflagged("Abbey Road"), RawAnswer::unflagged("Help!")],
        )]);

        assert!(set.questions[0].correct_answer().is_none());
        assert_eq!(set.warnings.len(), 1);
        assert_eq!(set.warnings[0].issue, DataQualityIssue::NoCorrectAnswer);
    }

    #[test]
    fn test_duplicate_id_replaced() {
        let set = validate_questions(vec![
            RawQuestion::new("One?", three_answers([true, false, false])).with_id("same"),
            RawQuestion::new("Two?", three_answers([true, false, false])).with_id("same"),
        ]);

        assert_eq!(set.questions[0].id.as_str(), "same");
        assert_eq!(set.questions[1].id.as_str(), "q2");
        assert_eq!(
            set.warnings[0].issue,
            DataQualityIssue::DuplicateId {
                original: "same".to_string()
            }
        );
    }

    #[test]
    fn test_blank_id_replaced() {
        let set = validate_questions(vec![
            RawQuestion::new("One?", three_answers([true, false, false])).with_id(""),
            RawQuestion::new("Two?", three_answers([true, false, false])).with_id("   "),
        ]);

        assert_eq!(set.questions[0].id.as_str(), "q1");
        assert_eq!(set.questions[1].id.as_str(), "q2");
        assert_eq!(set.warnings.len(), 2);
        assert!(
            set.warnings
                .iter()
                .all(|warning| warning.issue == DataQualityIssue::BlankId)
        );
    }

    #[test]
    fn test_positional_id_collision_gets_suffix() {
        let set = validate_questions(vec![
            RawQuestion::new("One?", three_answers([true, false, false])).with_id("q2"),
            RawQuestion::new("Two?", three_answers([true, false, false])),
        ]);

        assert_eq!(set.questions[1].id.as_str(), "q2-2");
    }

    #[test]
    fn test_correct_flag_forms() {
        assert!(CorrectFlag::Bool(true).is_set());
        assert!(CorrectFlag::Number(1).is_set());
        assert!(!CorrectFlag::Number(0).is_set());
        assert!(CorrectFlag::Text("1".to_string()).is_set());
        assert!(CorrectFlag::Text(" TRUE ".to_string()).is_set());
        assert!(!CorrectFlag::Text("0".to_string()).is_set());
    }

    #[test]
    fn test_wrapped_answers_deserialize() {
        let yaml = r#"
question:
  - text: "Who sang Purple Rain?"
    answers:
      a:
        - value: "Prince"
          correct: 1
        - value: "Madonna"
"#;
        let document: QuestionDocument = serde_yaml_ng::from_str(yaml).unwrap();
        let set = validate_questions(document.questions);

        assert_eq!(set.questions[0].answers.len(), 2);
        assert_eq!(set.questions[0].correct_answer().unwrap().text, "Prince");
        assert!(set.warnings.is_empty());
    }
}
