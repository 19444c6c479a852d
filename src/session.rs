//! Conversation-scoped state: the loaded embeddings and the question history.

use crate::config::EmptyContextPolicy;
use crate::corpus::{ContextScope, EmbeddingGroup};
use crate::error::{Result, TutorError};
use crate::rag::{Answer, AnswerRequest, Answerer};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Per-question choices made by the user.
#[derive(Debug, Clone)]
pub struct QuestionOptions {
    pub scope: ContextScope,
    pub request: AnswerRequest,
    pub on_empty_context: EmptyContextPolicy,
}

/// What happened when a question was submitted.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The answer, or `None` when the call was skipped.
    pub answer: Option<Answer>,
    /// The filters left no sections to answer from.
    pub degraded: bool,
    /// Number of sections that passed the filters.
    pub candidates: usize,
}

/// A chat session over one chapter's embeddings.
#[derive(Debug)]
pub struct Session {
    embeddings: EmbeddingGroup,
    history: Vec<String>,
}

impl Session {
    pub fn new(embeddings: EmbeddingGroup) -> Self {
        Self {
            embeddings,
            history: Vec::new(),
        }
    }

    /// Start a session by loading an embedding file.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(EmbeddingGroup::load(path)?))
    }

    /// The full, unfiltered collection.
    pub fn embeddings(&self) -> &EmbeddingGroup {
        &self.embeddings
    }

    /// Questions asked so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Forget the question history. The loaded embeddings are kept.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Filter the embeddings for a question and ask the answerer.
    #[instrument(skip(self, question, options, answerer))]
    pub async fn submit(
        &mut self,
        question: &str,
        options: &QuestionOptions,
        answerer: &dyn Answerer,
    ) -> Result<Outcome> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TutorError::InvalidInput("Question is empty".to_string()));
        }

        self.history.push(question.to_string());

        let selection = options.scope.select(&self.embeddings);
        let candidates = selection.embeddings.len();
        info!("{} of {} sections in scope", candidates, self.embeddings.len());

        if selection.degraded {
            warn!("Filters exclude all content from the context window");
            if options.on_empty_context == EmptyContextPolicy::Abort {
                return Ok(Outcome {
                    answer: None,
                    degraded: true,
                    candidates,
                });
            }
        }

        let mut request = options.request.clone();
        request.question = question.to_string();

        let answer = answerer
            .answer_question(&selection.embeddings, &request)
            .await?;

        Ok(Outcome {
            answer: Some(answer),
            degraded: selection.degraded,
            candidates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::group_from_titles;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the titles it was given and echoes them back.
    #[derive(Default)]
    struct RecordingAnswerer {
        seen: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl Answerer for RecordingAnswerer {
        async fn answer_question(
            &self,
            embeddings: &EmbeddingGroup,
            request: &AnswerRequest,
        ) -> Result<Answer> {
            if self.fail {
                return Err(TutorError::OpenAI("rate limited".to_string()));
            }
            let titles: Vec<String> = embeddings.titles().iter().map(|t| t.to_string()).collect();
            self.seen.lock().unwrap().push(titles.clone());
            Ok(Answer {
                text: format!("answer to {}", request.question),
                sources: titles,
            })
        }
    }

    fn session() -> Session {
        Session::new(group_from_titles(&["1.1 Intro (solution)", "1.1 Intro", "2.1 CNNs"]))
    }

    fn options(sets: &[&str], policy: EmptyContextPolicy) -> QuestionOptions {
        QuestionOptions {
            scope: ContextScope::default()
                .with_exercise_sets(sets.iter().map(|s| s.to_string()).collect()),
            request: AnswerRequest::new(""),
            on_empty_context: policy,
        }
    }

    #[tokio::test]
    async fn test_submit_passes_filtered_group() {
        let mut session = session();
        let answerer = RecordingAnswerer::default();

        let outcome = session
            .submit("What is a ray?", &options(&[], EmptyContextPolicy::Continue), &answerer)
            .await
            .unwrap();

        assert!(!outcome.degraded);
        assert_eq!(outcome.candidates, 2);
        assert_eq!(outcome.answer.unwrap().text, "answer to What is a ray?");
        assert_eq!(
            answerer.seen.lock().unwrap()[0],
            vec!["1.1 Intro".to_string(), "2.1 CNNs".to_string()]
        );
        assert_eq!(session.embeddings().len(), 3);
    }

    #[tokio::test]
    async fn test_abort_policy_skips_answerer() {
        let mut session = session();
        let answerer = RecordingAnswerer::default();

        let outcome = session
            .submit("Backprop?", &options(&["Backprop"], EmptyContextPolicy::Abort), &answerer)
            .await
            .unwrap();

        assert!(outcome.degraded);
        assert!(outcome.answer.is_none());
        assert!(answerer.seen.lock().unwrap().is_empty());
        assert_eq!(session.history(), &["Backprop?".to_string()]);
    }

    #[tokio::test]
    async fn test_continue_policy_still_answers() {
        let mut session = session();
        let answerer = RecordingAnswerer::default();

        let outcome = session
            .submit("Backprop?", &options(&["Backprop"], EmptyContextPolicy::Continue), &answerer)
            .await
            .unwrap();

        assert!(outcome.degraded);
        assert!(outcome.answer.is_some());
        assert!(answerer.seen.lock().unwrap()[0].is_empty());
    }

    #[tokio::test]
    async fn test_history_and_clear() {
        let mut session = session();
        let answerer = RecordingAnswerer::default();
        let opts = options(&[], EmptyContextPolicy::Continue);

        session.submit("first", &opts, &answerer).await.unwrap();
        session.submit("  second  ", &opts, &answerer).await.unwrap();
        assert_eq!(session.history(), &["first".to_string(), "second".to_string()]);

        session.clear();
        assert!(session.history().is_empty());
        assert_eq!(session.embeddings().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let mut session = session();
        let answerer = RecordingAnswerer::default();

        let err = session
            .submit("   ", &options(&[], EmptyContextPolicy::Continue), &answerer)
            .await
            .unwrap_err();

        assert!(matches!(err, TutorError::InvalidInput(_)));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_answerer_errors_propagate() {
        let mut session = session();
        let answerer = RecordingAnswerer {
            fail: true,
            ..Default::default()
        };

        let err = session
            .submit("Will this work?", &options(&[], EmptyContextPolicy::Continue), &answerer)
            .await
            .unwrap_err();

        assert!(matches!(err, TutorError::OpenAI(_)));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Session::open(&dir.path().join("none.json")).is_err());
    }
}
