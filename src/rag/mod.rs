//! Retrieval-augmented answering of questions about the course material.
//!
//! An [`Answerer`] receives an already-filtered [`EmbeddingGroup`] and a
//! question. It picks the most relevant sections within a token budget,
//! renders a prompt and asks a completion model.

pub mod context;
mod response;

pub use context::{cosine_similarity, format_context, rank_by_similarity, select_context};
pub use response::OpenAIAnswerer;

use crate::corpus::EmbeddingGroup;
use crate::error::{Result, TutorError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Prompt style used to present the context to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptTemplate {
    /// Plain context followed by the question.
    #[default]
    Simple,
    /// Numbered, titled sections with a request to cite them.
    Sources,
    /// Tutoring system prompt with titled excerpts.
    Complex,
}

impl std::str::FromStr for PromptTemplate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(PromptTemplate::Simple),
            "sources" => Ok(PromptTemplate::Sources),
            "complex" => Ok(PromptTemplate::Complex),
            _ => Err(format!("Unknown prompt template: {}", s)),
        }
    }
}

impl std::fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptTemplate::Simple => write!(f, "simple"),
            PromptTemplate::Sources => write!(f, "sources"),
            PromptTemplate::Complex => write!(f, "complex"),
        }
    }
}

/// Completion models the chatbot can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Model {
    #[serde(rename = "gpt-4")]
    Gpt4,
    #[default]
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "text-davinci-003")]
    TextDavinci003,
}

impl Model {
    pub const ALL: [Model; 3] = [Model::Gpt4, Model::Gpt35Turbo, Model::TextDavinci003];

    /// API identifier of the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gpt4 => "gpt-4",
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::TextDavinci003 => "text-davinci-003",
        }
    }

    /// Whether the model is served by the chat completions endpoint.
    pub fn is_chat(&self) -> bool {
        !matches!(self, Model::TextDavinci003)
    }
}

impl std::str::FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Model::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = Model::ALL.iter().map(|m| m.as_str()).collect();
                format!("Unknown model: {} (expected one of {})", s, known.join(", "))
            })
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the answerer needs besides the embeddings.
#[derive(Debug, Clone)]
pub struct AnswerRequest {
    pub question: String,
    pub prompt_template: PromptTemplate,
    pub model: Model,
    pub temperature: f32,
    /// Token budget for the retrieved context.
    pub max_context_len: usize,
    /// Maximum tokens in the generated answer.
    pub max_output_tokens: u32,
}

impl AnswerRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            prompt_template: PromptTemplate::default(),
            model: Model::default(),
            temperature: 0.5,
            max_context_len: 1500,
            max_output_tokens: 1500,
        }
    }

    /// Check the request before any API call is made.
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(TutorError::InvalidInput("Question is empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(TutorError::InvalidInput(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(TutorError::InvalidInput(
                "max_output_tokens must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A generated answer.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// Titles of the sections placed in the context, in prompt order.
    pub sources: Vec<String>,
}

/// Produces an answer from a set of embeddings and a question.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer_question(
        &self,
        embeddings: &EmbeddingGroup,
        request: &AnswerRequest,
    ) -> Result<Answer>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_parsing() {
        assert_eq!("gpt-4".parse::<Model>().unwrap(), Model::Gpt4);
        assert_eq!("GPT-3.5-turbo".parse::<Model>().unwrap(), Model::Gpt35Turbo);
        assert!("gpt-5".parse::<Model>().is_err());
        assert!(!Model::TextDavinci003.is_chat());
        assert_eq!(Model::Gpt4.to_string(), "gpt-4");
    }

    #[test]
    fn test_template_parsing() {
        assert_eq!("SOURCES".parse::<PromptTemplate>().unwrap(), PromptTemplate::Sources);
        assert!("fancy".parse::<PromptTemplate>().is_err());
    }

    #[test]
    fn test_request_validation() {
        assert!(AnswerRequest::new("What is a ray?").validate().is_ok());
        assert!(AnswerRequest::new("   ").validate().is_err());

        let mut request = AnswerRequest::new("What is a ray?");
        request.temperature = 2.0;
        assert!(request.validate().is_ok());
        request.temperature = -0.1;
        assert!(matches!(request.validate(), Err(TutorError::InvalidInput(_))));
    }
}
