//! List command implementation.

use super::{chapter_dir, context_scope};
use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, ScopeArgs};
use crate::config::Settings;
use crate::corpus::EmbeddingGroup;
use anyhow::Result;

/// Run the list command: show the sections a question would draw from.
pub fn run_list(scope: &ScopeArgs, settings: Settings) -> Result<()> {
    let chapter_dir = chapter_dir(&settings)?;
    let embeddings_path = settings.embeddings_path(&chapter_dir);
    preflight::check(Operation::List, &embeddings_path)?;

    let group = EmbeddingGroup::load(&embeddings_path)?;

    let selection = context_scope(&settings, scope).select(&group);

    if selection.degraded {
        Output::empty_context_warning();
        return Ok(());
    }

    Output::header(&format!("Sections in scope ({})", selection.embeddings.len()));
    println!();
    for entry in &selection.embeddings {
        Output::section(&entry.title, entry.n_tokens);
    }

    let total_tokens: usize = selection.embeddings.iter().map(|e| e.n_tokens).sum();
    println!();
    Output::kv("Sections", &format!("{} of {}", selection.embeddings.len(), group.len()));
    Output::kv("Total tokens", &total_tokens.to_string());
    Output::kv("Context budget", &settings.answer.max_context_len.to_string());

    Ok(())
}
