//! Pre-flight checks before operations that call the API.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::{Result, TutorError};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Asking questions requires an API key and the embedding file.
    Ask,
    /// Indexing requires an API key.
    Index,
    /// Listing sections only requires the embedding file.
    List,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, embeddings_path: &Path) -> Result<()> {
    match operation {
        Operation::Ask => {
            check_api_key()?;
            check_embeddings(embeddings_path)?;
        }
        Operation::Index => {
            check_api_key()?;
        }
        Operation::List => {
            check_embeddings(embeddings_path)?;
        }
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
pub fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(TutorError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(TutorError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

fn check_embeddings(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(TutorError::Corpus(format!(
            "Embedding file not found at {}. Build it with 'tutorbot index <dir>'.",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_needs_embedding_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my_embeddings.json");
        assert!(check(Operation::List, &path).is_err());

        std::fs::write(&path, "{\"embeddings\":[]}").unwrap();
        assert!(check(Operation::List, &path).is_ok());
    }
}
