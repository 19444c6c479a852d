//! Doctor command - verify configuration, workspace and embedding file.

use crate::cli::Output;
use crate::config::Settings;
use crate::corpus::EmbeddingGroup;
use crate::workspace::{discover_exercise_sets, resolve_chapter_dir};
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
///
/// `config_path` is the file the settings were loaded from (`--config` or the default).
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Tutorbot Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key(std::env::var("OPENAI_API_KEY").ok().as_deref());
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Workspace").bold());
    let cwd = std::env::current_dir()?;
    let workspace_checks = check_workspace(&cwd, settings);
    for check in &workspace_checks {
        check.print();
    }
    checks.extend(workspace_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Tutorbot.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Tutorbot is ready to use.");
    }

    Ok(())
}

/// Check the OpenAI API key value.
fn check_openai_api_key(key: Option<&str>) -> CheckResult {
    match key {
        Some(key) if key.starts_with("sk-") && key.len() > 20 => {
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", mask_key(key)))
        }
        Some("") => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Some(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        None => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// First 7 and last 4 characters of a key, split on char boundaries.
fn mask_key(key: &str) -> String {
    let head: String = key.chars().take(7).collect();
    let mut tail: Vec<char> = key.chars().rev().take(4).collect();
    tail.reverse();
    format!("{}...{}", head, tail.into_iter().collect::<String>())
}

/// Check the chapter directory, embedding file and pages.
fn check_workspace(cwd: &Path, settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let chapter_dir = match resolve_chapter_dir(cwd, &settings.general.chapter) {
        Ok(dir) => {
            results.push(CheckResult::ok("Chapter directory", &dir.display().to_string()));
            dir
        }
        Err(e) => {
            results.push(CheckResult::error(
                "Chapter directory",
                &e.to_string(),
                "Run tutorbot from the chapter directory or set general.chapter",
            ));
            return results;
        }
    };

    let embeddings_path = settings.embeddings_path(&chapter_dir);
    match EmbeddingGroup::load(&embeddings_path) {
        Ok(group) if group.is_empty() => results.push(CheckResult::warning(
            "Embedding file",
            "contains no sections",
            "Rebuild with: tutorbot index <dir>",
        )),
        Ok(group) => results.push(CheckResult::ok(
            "Embedding file",
            &format!("{} sections ({})", group.len(), embeddings_path.display()),
        )),
        Err(e) => results.push(CheckResult::error(
            "Embedding file",
            &e.to_string(),
            "Build with: tutorbot index <dir>",
        )),
    }

    match discover_exercise_sets(&settings.pages_dir(&chapter_dir)) {
        Ok(sets) if !sets.is_empty() => results.push(CheckResult::ok(
            "Exercise sets",
            &sets.join(", "),
        )),
        Ok(_) => results.push(CheckResult::warning(
            "Exercise sets",
            "none found",
            "Set general.pages_dir to the directory of numbered pages",
        )),
        Err(e) => results.push(CheckResult::warning(
            "Exercise sets",
            &e.to_string(),
            "Set general.pages_dir to the directory of numbered pages",
        )),
    }

    results
}

/// Check if the config file in use exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: tutorbot config init",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_api_key_checks() {
        assert_eq!(check_openai_api_key(None).status, CheckStatus::Error);
        assert_eq!(check_openai_api_key(Some("")).status, CheckStatus::Error);
        assert_eq!(check_openai_api_key(Some("abc")).status, CheckStatus::Warning);

        let ok = check_openai_api_key(Some("sk-abcdefghijklmnopqrstuvwxyz"));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert!(ok.message.contains("sk-abcd...wxyz"));
    }

    #[test]
    fn test_api_key_mask_non_ascii() {
        let ok = check_openai_api_key(Some("sk-é€abcdefghijklmnopqrstü"));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert!(ok.message.contains("sk-é€ab...rstü"));
        assert_eq!(mask_key("sk-€"), "sk-€...sk-€");
    }

    #[test]
    fn test_config_file_check_uses_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");

        let missing = check_config_file(&path);
        assert_eq!(missing.status, CheckStatus::Warning);

        std::fs::write(&path, "").unwrap();
        let found = check_config_file(&path);
        assert_eq!(found.status, CheckStatus::Ok);
        assert_eq!(found.message, path.display().to_string());
    }

    #[test]
    fn test_workspace_checks() {
        let root = tempfile::tempdir().unwrap();
        let settings = Settings::default();

        let missing = check_workspace(root.path(), &settings);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].status, CheckStatus::Error);

        let chapter = root.path().join("chapter0_fundamentals");
        let pages = chapter.join("instructions").join("pages");
        std::fs::create_dir_all(&pages).unwrap();
        std::fs::write(pages.join("1_[1]_Ray_Tracing.py"), "").unwrap();
        crate::corpus::group_from_titles(&["1.1 Intro"])
            .save(&settings.embeddings_path(&chapter))
            .unwrap();

        let found = check_workspace(root.path(), &settings);
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|c| c.status == CheckStatus::Ok));
        assert_eq!(found[2].message, "Ray Tracing");
    }
}
