//! Sets command implementation.

use super::chapter_dir;
use crate::cli::Output;
use crate::config::Settings;
use crate::workspace::discover_exercise_sets;
use anyhow::Result;

/// Run the sets command.
pub fn run_sets(settings: Settings) -> Result<()> {
    let chapter_dir = chapter_dir(&settings)?;
    let sets = discover_exercise_sets(&settings.pages_dir(&chapter_dir))?;

    if sets.is_empty() {
        Output::info("No exercise sets found.");
        return Ok(());
    }

    Output::header(&format!("Exercise sets ({})", sets.len()));
    println!();
    for set in &sets {
        Output::list_item(set);
    }
    println!();
    Output::info("Restrict context with: tutorbot ask --sets \"<set>,<set>\" \"<question>\"");

    Ok(())
}
