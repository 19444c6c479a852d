//! Title filters that narrow an embedding group to a question's scope.

use super::EmbeddingGroup;
use serde::{Deserialize, Serialize};

/// Substring marking solution sections in titles.
pub const DEFAULT_SOLUTION_MARKER: &str = "(solution)";

/// A pure predicate over embedding titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleFilter {
    /// Keep titles that do not contain the substring.
    ExcludeSubstring(String),
    /// Keep titles that contain any of the substrings. Empty keeps everything.
    IncludeAny(Vec<String>),
}

impl TitleFilter {
    pub fn matches(&self, title: &str) -> bool {
        match self {
            TitleFilter::ExcludeSubstring(marker) => !title.contains(marker.as_str()),
            TitleFilter::IncludeAny(names) => {
                names.is_empty() || names.iter().any(|n| title.contains(n.as_str()))
            }
        }
    }

    pub fn apply(&self, group: &EmbeddingGroup) -> EmbeddingGroup {
        group.filter(|title| self.matches(title))
    }
}

/// Turn an exercise set identifier into the form used in titles.
///
/// `"Ray_Tracing"` becomes `"Ray Tracing"`.
pub fn normalize_scope_name(name: &str) -> String {
    name.replace('_', " ").trim().to_string()
}

/// Which parts of the material a question may draw context from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextScope {
    /// Keep solution sections in the context.
    pub include_solutions: bool,
    /// Exercise sets to restrict to. Empty means all sets.
    pub exercise_sets: Vec<String>,
    /// Substring identifying solution sections.
    pub solution_marker: String,
}

impl Default for ContextScope {
    fn default() -> Self {
        Self {
            include_solutions: false,
            exercise_sets: Vec::new(),
            solution_marker: DEFAULT_SOLUTION_MARKER.to_string(),
        }
    }
}

impl ContextScope {
    pub fn with_exercise_sets(mut self, sets: Vec<String>) -> Self {
        self.exercise_sets = sets;
        self
    }

    pub fn with_solutions(mut self, include: bool) -> Self {
        self.include_solutions = include;
        self
    }

    /// The filter stages this scope applies, in order.
    pub fn filters(&self) -> Vec<TitleFilter> {
        let mut filters = Vec::with_capacity(2);

        if !self.include_solutions {
            filters.push(TitleFilter::ExcludeSubstring(self.solution_marker.clone()));
        }

        let names: Vec<String> = self
            .exercise_sets
            .iter()
            .map(|s| normalize_scope_name(s))
            .filter(|s| !s.is_empty())
            .collect();
        if !names.is_empty() {
            filters.push(TitleFilter::IncludeAny(names));
        }

        filters
    }

    /// Apply the scope to a group.
    pub fn select(&self, group: &EmbeddingGroup) -> Selection {
        let embeddings = self
            .filters()
            .iter()
            .fold(group.clone(), |acc, filter| filter.apply(&acc));
        let degraded = embeddings.is_empty();

        Selection {
            embeddings,
            degraded,
        }
    }
}

/// The result of applying a [`ContextScope`].
#[derive(Debug, Clone)]
pub struct Selection {
    pub embeddings: EmbeddingGroup,
    /// Set when the filters removed every entry, so an answer would have no
    /// grounding context.
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::group_from_titles;

    fn sample() -> EmbeddingGroup {
        group_from_titles(&["1.1 Intro (solution)", "1.1 Intro", "2.1 CNNs"])
    }

    #[test]
    fn test_exclude_then_scope() {
        let group = sample();

        let no_solutions = ContextScope::default().select(&group);
        assert_eq!(no_solutions.embeddings.titles(), vec!["1.1 Intro", "2.1 CNNs"]);
        assert!(!no_solutions.degraded);

        let scoped = ContextScope::default()
            .with_exercise_sets(vec!["1.1 Intro".to_string()])
            .select(&group);
        assert_eq!(scoped.embeddings.titles(), vec!["1.1 Intro"]);
    }

    #[test]
    fn test_unmatched_scope_is_degraded() {
        let selection = ContextScope::default()
            .with_exercise_sets(vec!["Backprop".to_string()])
            .select(&sample());

        assert!(selection.embeddings.is_empty());
        assert!(selection.degraded);
    }

    #[test]
    fn test_empty_scope_is_identity() {
        let group = sample();
        let filter = TitleFilter::IncludeAny(vec![]);
        assert_eq!(filter.apply(&group), group);

        let selection = ContextScope::default().with_solutions(true).select(&group);
        assert_eq!(selection.embeddings, group);
        assert!(ContextScope::default().with_solutions(true).filters().is_empty());
    }

    #[test]
    fn test_filter_order_does_not_matter() {
        let group = group_from_titles(&[
            "1.1 Intro (solution)",
            "1.1 Intro",
            "2.1 CNNs (solution)",
            "2.1 CNNs",
            "3.1 Backprop",
        ]);
        let exclude = TitleFilter::ExcludeSubstring(DEFAULT_SOLUTION_MARKER.to_string());
        let include = TitleFilter::IncludeAny(vec!["CNNs".to_string(), "Intro".to_string()]);

        let forward = include.apply(&exclude.apply(&group));
        let reverse = exclude.apply(&include.apply(&group));

        assert_eq!(forward, reverse);
        assert_eq!(forward.titles(), vec!["1.1 Intro", "2.1 CNNs"]);
    }

    #[test]
    fn test_scope_names_are_normalized() {
        let group = group_from_titles(&["1.2 Ray Tracing basics", "2.1 CNNs"]);
        let selection = ContextScope::default()
            .with_exercise_sets(vec!["Ray_Tracing".to_string()])
            .select(&group);

        assert_eq!(selection.embeddings.titles(), vec!["1.2 Ray Tracing basics"]);
        assert_eq!(normalize_scope_name(" Ray_Tracing "), "Ray Tracing");
    }

    #[test]
    fn test_include_solutions_keeps_them() {
        let selection = ContextScope::default()
            .with_solutions(true)
            .with_exercise_sets(vec!["Intro".to_string()])
            .select(&sample());

        assert_eq!(
            selection.embeddings.titles(),
            vec!["1.1 Intro (solution)", "1.1 Intro"]
        );
    }

    #[test]
    fn test_select_leaves_base_group_untouched() {
        let group = sample();
        let _ = ContextScope::default()
            .with_exercise_sets(vec!["nothing".to_string()])
            .select(&group);
        assert_eq!(group.len(), 3);
    }
}
