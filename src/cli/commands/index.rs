//! Index command implementation.

use super::chapter_dir;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::OpenAIEmbedder;
use crate::indexer::{build_embedding_group, read_pages};
use anyhow::Result;
use std::path::PathBuf;

/// Run the index command.
pub async fn run_index(dir: &str, output: Option<String>, settings: Settings) -> Result<()> {
    let output_path = match output {
        Some(path) => Settings::expand_path(&path),
        None => settings.embeddings_path(&chapter_dir(&settings)?),
    };

    if let Err(e) = preflight::check(Operation::Index, &output_path) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let pages = read_pages(&PathBuf::from(shellexpand::tilde(dir).to_string()))?;
    if pages.is_empty() {
        Output::warning(&format!("No markdown pages found in {}", dir));
        return Ok(());
    }
    Output::info(&format!("Read {} pages", pages.len()));

    let embedder = OpenAIEmbedder::from_settings(&settings.embedding)?;

    let spinner = Output::spinner(&format!("Embedding sections with {}...", settings.embedding.model));
    let result = build_embedding_group(&pages, &embedder).await;
    spinner.finish_and_clear();

    let group = result?;
    group.save(&output_path)?;

    Output::success(&format!(
        "Indexed {} sections to {}",
        group.len(),
        output_path.display()
    ));

    Ok(())
}
