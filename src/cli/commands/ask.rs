//! Ask command implementation.

use super::{build_answerer, chapter_dir, question_options};
use crate::cli::preflight::{self, Operation};
use crate::cli::{GenerationArgs, Output, ScopeArgs};
use crate::config::Settings;
use crate::session::Session;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    scope: &ScopeArgs,
    generation: &GenerationArgs,
    settings: Settings,
) -> Result<()> {
    let chapter_dir = chapter_dir(&settings)?;
    let embeddings_path = settings.embeddings_path(&chapter_dir);

    if let Err(e) = preflight::check(Operation::Ask, &embeddings_path) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tutorbot doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut session = Session::open(&embeddings_path)?;
    let options = question_options(&settings, scope, generation);
    let answerer = build_answerer(&settings)?;

    let spinner = Output::spinner("Thinking...");
    let result = session.submit(question, &options, &answerer).await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            if outcome.degraded {
                Output::empty_context_warning();
            }
            match outcome.answer {
                Some(answer) => Output::answer(&answer),
                None => Output::info("Skipped answering because no context is left."),
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
