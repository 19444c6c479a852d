//! Locating the chapter directory and its exercise sets.

use crate::error::{Result, TutorError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Find the chapter directory starting from `start`.
///
/// `start/chapter` is preferred; otherwise `start` and its ancestors are
/// searched for a directory named `chapter`.
pub fn resolve_chapter_dir(start: &Path, chapter: &str) -> Result<PathBuf> {
    if chapter.is_empty() {
        return Err(TutorError::Workspace("Chapter name is empty".to_string()));
    }

    let child = start.join(chapter);
    if child.is_dir() {
        debug!("Using chapter directory {}", child.display());
        return Ok(child);
    }

    start
        .ancestors()
        .find(|dir| dir.file_name().is_some_and(|name| name == chapter) && dir.is_dir())
        .map(|dir| {
            debug!("Using chapter directory {}", dir.display());
            dir.to_path_buf()
        })
        .ok_or_else(|| {
            TutorError::Workspace(format!(
                "Current dir is {}. Please run from inside the `{}` directory or its parent.",
                start.display(),
                chapter
            ))
        })
}

fn page_regex() -> &'static Regex {
    static PAGE: OnceLock<Regex> = OnceLock::new();
    PAGE.get_or_init(|| Regex::new(r"^\d[^\]]*\](.+)$").expect("valid page regex"))
}

/// Exercise set name for a page file stem, e.g. `1_[1]_Ray_Tracing` → `Ray Tracing`.
///
/// Returns `None` for stems that are not numbered exercise pages or that
/// belong to the chatbot page itself.
pub fn exercise_set_name(stem: &str) -> Option<String> {
    if stem.contains("Chatbot") {
        return None;
    }
    let caps = page_regex().captures(stem)?;
    let name = caps[1].replace('_', " ").trim().to_string();
    (!name.is_empty()).then_some(name)
}

/// List the exercise sets of a chapter from its page files, ordered by file name.
pub fn discover_exercise_sets(pages_dir: &Path) -> Result<Vec<String>> {
    if !pages_dir.is_dir() {
        return Err(TutorError::Workspace(format!(
            "Pages directory not found: {}",
            pages_dir.display()
        )));
    }

    let mut stems: Vec<String> = std::fs::read_dir(pages_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .collect();
    stems.sort();

    Ok(stems.iter().filter_map(|s| exercise_set_name(s)).collect())
}
