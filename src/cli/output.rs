//! CLI output formatting utilities.

use crate::rag::Answer;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a section title with its token count.
    pub fn section(title: &str, n_tokens: usize) {
        println!(
            "  {} {} {}",
            style("*").cyan(),
            title,
            style(format!("({} tokens)", n_tokens)).dim()
        );
    }

    /// Warn that the filters excluded every section.
    pub fn empty_context_warning() {
        Self::warning("Warning - your filters are excluding all content from the chatbot's context window.");
    }

    /// Print a question as it appears in the history.
    pub fn question(msg: &str) {
        println!("{} {}", style("Q:").green().bold(), msg);
    }

    /// Print a generated answer and the sections it was grounded on.
    pub fn answer(answer: &Answer) {
        println!("\n{}\n", answer.text.trim());

        if !answer.sources.is_empty() {
            println!("{}", style("Context").dim().underlined());
            for (i, source) in answer.sources.iter().enumerate() {
                println!("  {} {}", style(format!("[{}]", i + 1)).dim(), style(source).dim());
            }
            println!();
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
