//! The embedding collection for a chapter of course material.
//!
//! An [`EmbeddingGroup`] is loaded once per session and then narrowed with
//! title filters before each question. Filtering always produces a new group.

pub mod filter;
pub mod sections;

pub use filter::{normalize_scope_name, ContextScope, Selection, TitleFilter, DEFAULT_SOLUTION_MARKER};
pub use sections::{estimate_tokens, split_sections, Section};

use crate::error::{Result, TutorError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A single titled piece of course material with its embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// Section title, e.g. "1.1 Intro (solution)". Used as the filter key.
    pub title: String,
    /// Text placed into the prompt when this entry is selected.
    pub text: String,
    /// Token count of `text`, used against the context budget.
    pub n_tokens: usize,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl Embedding {
    /// Create an embedding, estimating its token count from the text.
    pub fn new(title: impl Into<String>, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        let text = text.into();
        Self {
            title: title.into(),
            n_tokens: estimate_tokens(&text),
            text,
            embedding,
        }
    }
}

/// An ordered collection of embeddings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingGroup {
    embeddings: Vec<Embedding>,
}

impl EmbeddingGroup {
    /// Create a group from embeddings, keeping their order.
    pub fn new(embeddings: Vec<Embedding>) -> Self {
        Self { embeddings }
    }

    /// Return a new group holding the entries whose title satisfies `predicate`.
    ///
    /// Relative order is preserved and `self` is left untouched.
    pub fn filter<F>(&self, predicate: F) -> EmbeddingGroup
    where
        F: Fn(&str) -> bool,
    {
        EmbeddingGroup {
            embeddings: self
                .embeddings
                .iter()
                .filter(|e| predicate(&e.title))
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Embedding> {
        self.embeddings.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Embedding> {
        self.embeddings.get(index)
    }

    /// Titles in collection order.
    pub fn titles(&self) -> Vec<&str> {
        self.embeddings.iter().map(|e| e.title.as_str()).collect()
    }

    /// Load a group from a JSON embedding file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TutorError::Corpus(format!(
                "Embedding file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let group: EmbeddingGroup = serde_json::from_str(&content).map_err(|e| {
            TutorError::Corpus(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        info!("Loaded {} embeddings from {}", group.len(), path.display());
        Ok(group)
    }

    /// Write the group to a JSON embedding file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(self)?;
        std::fs::write(path, content)?;
        debug!("Saved {} embeddings to {}", self.len(), path.display());
        Ok(())
    }
}

impl FromIterator<Embedding> for EmbeddingGroup {
    fn from_iter<I: IntoIterator<Item = Embedding>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EmbeddingGroup {
    type Item = &'a Embedding;
    type IntoIter = std::slice::Iter<'a, Embedding>;

    fn into_iter(self) -> Self::IntoIter {
        self.embeddings.iter()
    }
}

#[cfg(test)]
pub(crate) fn group_from_titles(titles: &[&str]) -> EmbeddingGroup {
    titles
        .iter()
        .map(|t| Embedding::new(*t, format!("Content of {}", t), vec![1.0, 0.0]))
        .collect()
}
