//! Building an embedding file from a chapter's markdown pages.

use crate::corpus::{split_sections, Embedding, EmbeddingGroup};
use crate::embedding::Embedder;
use crate::error::{Result, TutorError};
use crate::workspace::exercise_set_name;
use std::path::Path;
use tracing::{info, instrument};

/// A markdown page and the title its sections are prefixed with.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub markdown: String,
}

/// Title for a page file stem: the exercise set name when the stem is a
/// numbered page, otherwise the stem with underscores as spaces.
pub fn page_title(stem: &str) -> String {
    exercise_set_name(stem).unwrap_or_else(|| stem.replace('_', " ").trim().to_string())
}

/// Read the `.md` files of a directory, ordered by file name.
pub fn read_pages(dir: &Path) -> Result<Vec<Page>> {
    if !dir.is_dir() {
        return Err(TutorError::InvalidInput(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| -> Result<Page> {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            Ok(Page {
                title: page_title(stem),
                markdown: std::fs::read_to_string(path)?,
            })
        })
        .collect()
}

/// Split pages into sections and embed them, keeping page and section order.
#[instrument(skip(pages, embedder), fields(pages = pages.len()))]
pub async fn build_embedding_group(pages: &[Page], embedder: &dyn Embedder) -> Result<EmbeddingGroup> {
    let sections: Vec<_> = pages
        .iter()
        .flat_map(|page| split_sections(&page.title, &page.markdown))
        .collect();

    if sections.is_empty() {
        return Err(TutorError::InvalidInput("No sections found in pages".to_string()));
    }

    let texts: Vec<String> = sections
        .iter()
        .map(|s| format!("{}\n\n{}", s.title, s.text))
        .collect();
    let vectors = embedder.embed_batch(&texts).await?;

    if vectors.len() != sections.len() {
        return Err(TutorError::Embedding(format!(
            "Expected {} embeddings, got {}",
            sections.len(),
            vectors.len()
        )));
    }

    info!("Embedded {} sections with {}", sections.len(), embedder.model());

    Ok(sections
        .into_iter()
        .zip(vectors)
        .map(|(section, vector)| Embedding::new(section.title, section.text, vector))
        .collect())
}
