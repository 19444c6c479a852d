//! CLI module for Tutorbot.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::rag::{Model, PromptTemplate};
use clap::{Args, Parser, Subcommand};

/// Tutorbot - ask questions about course material
///
/// Answers are generated by an OpenAI model from the sections of the chapter
/// that best match your question.
#[derive(Parser, Debug)]
#[command(name = "tutorbot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which sections of the chapter may be used as context.
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Exercise sets to draw context from (comma separated, default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub sets: Vec<String>,

    /// Include exercise solutions in the context
    #[arg(long)]
    pub include_solutions: bool,

    /// Exclude exercise solutions even when the config includes them
    #[arg(long, conflicts_with = "include_solutions")]
    pub no_include_solutions: bool,
}

/// How answers are generated.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Model to answer with (gpt-4, gpt-3.5-turbo, text-davinci-003)
    #[arg(short, long)]
    pub model: Option<Model>,

    /// Sampling temperature (0.0-2.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Prompt template (simple, sources, complex)
    #[arg(long)]
    pub template: Option<PromptTemplate>,

    /// Skip the model call when the filters leave no context
    #[arg(long)]
    pub abort_on_empty: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a single question about the material
    Ask {
        /// The question to ask
        question: String,

        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// Start an interactive question session
    Chat {
        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        generation: GenerationArgs,
    },

    /// List the sections that would be used as context
    List {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// List the chapter's exercise sets
    Sets,

    /// Build the embedding file from a directory of markdown pages
    Index {
        /// Directory containing the chapter's markdown pages
        dir: String,

        /// Output file (defaults to the configured embedding file)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check configuration, API key and embedding file
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init,

    /// Show configuration file path
    Path,
}
