//! Context selection: ranking sections against a question and fitting them
//! into the token budget.

use super::PromptTemplate;
use crate::corpus::{Embedding, EmbeddingGroup};

/// Tokens added per section for the separator between sections.
const SEPARATOR_TOKENS: usize = 4;

const SIMPLE_SEPARATOR: &str = "\n\n###\n\n";

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Indices and scores of the group's entries, best match first.
///
/// Equal scores keep collection order.
pub fn rank_by_similarity(group: &EmbeddingGroup, query: &[f32]) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = group
        .iter()
        .enumerate()
        .map(|(i, e)| (i, cosine_similarity(query, &e.embedding)))
        .collect();

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// Pick the best-matching entries that fit within `max_context_len` tokens.
///
/// Entries are taken in ranking order until the next one would exceed the
/// budget. With `chronological` set, the picked entries are returned in
/// collection order instead of ranking order.
pub fn select_context<'a>(
    group: &'a EmbeddingGroup,
    query: &[f32],
    max_context_len: usize,
    chronological: bool,
) -> Vec<&'a Embedding> {
    let mut picked: Vec<usize> = Vec::new();
    let mut cur_len = 0;

    for (index, _score) in rank_by_similarity(group, query) {
        let Some(entry) = group.get(index) else {
            continue;
        };
        cur_len += entry.n_tokens + SEPARATOR_TOKENS;
        if cur_len > max_context_len {
            break;
        }
        picked.push(index);
    }

    if chronological {
        picked.sort_unstable();
    }

    picked.into_iter().filter_map(|i| group.get(i)).collect()
}

/// Format selected sections for a prompt template.
pub fn format_context(sections: &[&Embedding], template: PromptTemplate) -> String {
    match template {
        PromptTemplate::Simple => sections
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(SIMPLE_SEPARATOR),
        PromptTemplate::Sources => sections
            .iter()
            .enumerate()
            .map(|(i, e)| format!("[{}] {}\n{}", i + 1, e.title, e.text))
            .collect::<Vec<_>>()
            .join("\n\n"),
        PromptTemplate::Complex => sections
            .iter()
            .map(|e| format!("---\n{}\n{}\n---", e.title, e.text))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, n_tokens: usize, embedding: Vec<f32>) -> Embedding {
        Embedding {
            title: title.to_string(),
            text: format!("{} text", title),
            n_tokens,
            embedding,
        }
    }

    fn sample() -> EmbeddingGroup {
        EmbeddingGroup::new(vec![
            entry("a", 10, vec![0.0, 1.0]),
            entry("b", 10, vec![1.0, 0.0]),
            entry("c", 10, vec![0.7, 0.7]),
        ])
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
    }

    #[test]
    fn test_rank_by_similarity() {
        let ranked = rank_by_similarity(&sample(), &[1.0, 0.0]);
        let order: Vec<usize> = ranked.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_rank_ties_keep_collection_order() {
        let group = EmbeddingGroup::new(vec![
            entry("x", 1, vec![1.0, 0.0]),
            entry("y", 1, vec![1.0, 0.0]),
            entry("z", 1, vec![1.0, 0.0]),
        ]);
        let order: Vec<usize> = rank_by_similarity(&group, &[1.0, 0.0])
            .iter()
            .map(|(i, _)| *i)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_select_respects_budget() {
        let group = sample();

        // Each entry costs 14 tokens: two fit in 30, three would need 42.
        let picked = select_context(&group, &[1.0, 0.0], 30, false);
        let titles: Vec<&str> = picked.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);

        assert!(select_context(&group, &[1.0, 0.0], 10, false).is_empty());
        assert_eq!(select_context(&group, &[1.0, 0.0], 100, false).len(), 3);
    }

    #[test]
    fn test_select_chronological() {
        let group = sample();
        let picked = select_context(&group, &[1.0, 0.0], 100, true);
        let titles: Vec<&str> = picked.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_select_from_empty_group() {
        let group = EmbeddingGroup::default();
        assert!(select_context(&group, &[1.0, 0.0], 1500, true).is_empty());
    }

    #[test]
    fn test_format_context() {
        let group = sample();
        let sections: Vec<&Embedding> = group.iter().take(2).collect();

        assert_eq!(
            format_context(&sections, PromptTemplate::Simple),
            "a text\n\n###\n\nb text"
        );
        assert_eq!(
            format_context(&sections, PromptTemplate::Sources),
            "[1] a\na text\n\n[2] b\nb text"
        );
        assert!(format_context(&sections, PromptTemplate::Complex).starts_with("---\na\na text\n---"));
    }
}
