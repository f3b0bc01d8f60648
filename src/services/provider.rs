use crate::error::ProviderError;
use crate::models::{QuestionDocument, RawQuestion};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};

/// Source of quiz questions.
///
/// `fetch_questions` is the session's only suspend point. An empty list is a
/// valid result; an error ends the session before it starts.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    async fn fetch_questions(&self) -> Result<Vec<RawQuestion>, ProviderError>;
}

#[async_trait]
impl<P: QuestionProvider + ?Sized> QuestionProvider for Box<P> {
    async fn fetch_questions(&self) -> Result<Vec<RawQuestion>, ProviderError> {
        (**self).fetch_questions().await
    }
}

/// Parse a question document.
///
/// Accepts YAML and JSON (the YAML parser reads both). An empty document
/// holds no questions.
pub fn parse_question_document(contents: &str) -> Result<Vec<RawQuestion>, serde_yaml_ng::Error> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: QuestionDocument = serde_yaml_ng::from_str(contents)?;
    Ok(document.questions)
}

/// Loads questions from a YAML or JSON file.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: Utf8PathBuf,
}

impl FileProvider {
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

#[async_trait]
impl QuestionProvider for FileProvider {
    async fn fetch_questions(&self) -> Result<Vec<RawQuestion>, ProviderError> {
        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| ProviderError::Read {
                    path: self.path.clone(),
                    source,
                })?;

        let questions =
            parse_question_document(&contents).map_err(|e| ProviderError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        tracing::info!("Loaded {} questions from {}", questions.len(), self.path);
        Ok(questions)
    }
}

/// Serves a fixed question list, or a fixed failure.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    outcome: Result<Vec<RawQuestion>, String>,
}

impl StaticProvider {
    pub fn new(questions: Vec<RawQuestion>) -> Self {
        Self {
            outcome: Ok(questions),
        }
    }

    /// A provider whose every fetch fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
        }
    }
}

#[async_trait]
impl QuestionProvider for StaticProvider {
    async fn fetch_questions(&self) -> Result<Vec<RawQuestion>, ProviderError> {
        match &self.outcome {
            Ok(questions) => Ok(questions.clone()),
            Err(reason) => Err(ProviderError::Unavailable(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawAnswer;

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_question_document("").unwrap().is_empty());
        assert!(parse_question_document("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_feed() {
        let json = r#"{"question": [{"text": "Who wrote Jolene?", "answers": {"a": [
            {"value": "Dolly Parton", "correct": 1},
            {"value": "Loretta Lynn", "correct": 0}
        ]}}]}"#;

        let questions = parse_question_document(json).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Who wrote Jolene?");
        assert_eq!(questions[0].answers.clone().into_vec().len(), 2);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_question_document("questions: 12").is_err());
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticProvider::new(vec![RawQuestion::new(
            "One?",
            vec![RawAnswer::new("yes", true)],
        )]);
        assert_eq!(provider.fetch_questions().await.unwrap().len(), 1);

        let failing = StaticProvider::failing("offline");
        assert!(matches!(
            failing.fetch_questions().await,
            Err(ProviderError::Unavailable(reason)) if reason == "offline"
        ));
    }

    #[tokio::test]
    async fn test_boxed_provider() {
        let provider: Box<dyn QuestionProvider> = Box::new(StaticProvider::new(Vec::new()));
        assert!(provider.fetch_questions().await.unwrap().is_empty());
    }
}
