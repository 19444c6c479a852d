//! Tutorbot - ask questions about course material
//!
//! A CLI chatbot that answers questions about a chapter of educational
//! material. Answers come from an OpenAI model, grounded in the chapter
//! sections whose embeddings best match the question.
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `workspace` - Chapter directory and exercise set discovery
//! - `corpus` - The embedding collection and its title filters
//! - `embedding` - Embedding generation
//! - `rag` - Context selection and answer generation
//! - `session` - Question history and the filter-then-answer flow
//! - `indexer` - Building the embedding file from markdown pages
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use tutorbot::config::EmptyContextPolicy;
//! use tutorbot::corpus::ContextScope;
//! use tutorbot::embedding::OpenAIEmbedder;
//! use tutorbot::rag::{AnswerRequest, OpenAIAnswerer};
//! use tutorbot::session::{QuestionOptions, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut session = Session::open(Path::new("instructions/my_embeddings.json"))?;
//!     let embedder = Arc::new(OpenAIEmbedder::with_config("text-embedding-ada-002", None)?);
//!     let answerer = OpenAIAnswerer::new(embedder)?;
//!
//!     let options = QuestionOptions {
//!         scope: ContextScope::default().with_exercise_sets(vec!["CNNs".to_string()]),
//!         request: AnswerRequest::new(""),
//!         on_empty_context: EmptyContextPolicy::Continue,
//!     };
//!
//!     let outcome = session.submit("What does a stride do?", &options, &answerer).await?;
//!     if let Some(answer) = outcome.answer {
//!         println!("{}", answer.text);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod openai;
pub mod rag;
pub mod session;
pub mod workspace;

pub use error::{Result, TutorError};
