//! Splitting markdown course pages into titled sections for indexing.

use regex::Regex;
use std::sync::OnceLock;

/// A titled section of a course page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub text: String,
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^#{1,6}\s+(.+?)(?:\s+#+)?\s*$").expect("valid heading regex"))
}

/// Rough token estimate (about four characters per token).
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Split a markdown page into sections at its headings.
///
/// Section titles are `"{page_title} - {heading}"`. Text before the first
/// heading is titled with the page title alone. Headings inside fenced code
/// blocks are ignored, and sections with no body text are dropped.
pub fn split_sections(page_title: &str, markdown: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_title = page_title.to_string();
    let mut current_body: Vec<&str> = Vec::new();
    let mut in_fence = false;

    let mut flush = |title: &str, body: &mut Vec<&str>| {
        let text = body.join("\n").trim().to_string();
        if !text.is_empty() {
            sections.push(Section {
                title: title.to_string(),
                text,
            });
        }
        body.clear();
    };

    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            current_body.push(line);
            continue;
        }

        if !in_fence {
            if let Some(caps) = heading_regex().captures(line) {
                flush(&current_title, &mut current_body);
                current_title = format!("{} - {}", page_title, &caps[1]);
                continue;
            }
        }

        current_body.push(line);
    }
    flush(&current_title, &mut current_body);

    sections
}
