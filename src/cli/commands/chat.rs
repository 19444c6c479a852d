//! Interactive question session.

use super::{build_answerer, chapter_dir, question_options};
use crate::cli::preflight::{self, Operation};
use crate::cli::{GenerationArgs, Output, ScopeArgs};
use crate::config::Settings;
use crate::session::Session;
use console::style;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Run the interactive chat command.
///
/// Each line is answered on its own; earlier questions are kept only for
/// display with `history`.
pub async fn run_chat(
    scope: &ScopeArgs,
    generation: &GenerationArgs,
    settings: Settings,
) -> anyhow::Result<()> {
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

    println!("\n{}", style("Tutorbot").bold().cyan());
    println!(
        "{}",
        style(format!(
            "{} sections loaded, model {}, temperature {}",
            session.embeddings().len(),
            options.request.model,
            options.request.temperature
        ))
        .dim()
    );
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'history' to list questions and 'clear' to reset them.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            session.clear();
            Output::info("Question history cleared.");
            continue;
        }

        if input.eq_ignore_ascii_case("history") {
            if session.history().is_empty() {
                Output::info("No questions yet.");
            }
            for question in session.history() {
                Output::question(question);
            }
            continue;
        }

        debug!("Question {} in session", session.history().len() + 1);

        let spinner = Output::spinner("Thinking...");
        let result = session.submit(input, &options, &answerer).await;
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
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
