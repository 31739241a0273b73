//! Merging of tree-analyzer and external-reviewer results.
//!
//! The merge is a pure function: near-duplicate findings on the same line
//! are collapsed into the existing entry, everything else is appended,
//! and the combined list is ranked by severity then line.

use crate::issue::{Issue, IssueSource};

/// Two messages on the same line above this similarity are one finding.
///
/// The measure is a deliberately crude bag-of-words Jaccard index;
/// anything smarter would change which issues merge.
const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Merge external issues into the analyzer's, collapsing duplicates.
///
/// Scan order is the current accumulated order: the first same-line entry
/// whose message is similar enough absorbs the external issue — its
/// suggestion gains an "(LLM: …)" annotation and its source becomes
/// `ast+llm`. The final list is stable-sorted by (severity rank, line).
pub fn merge(ast_issues: &[Issue], llm_issues: &[Issue]) -> Vec<Issue> {
    let mut merged: Vec<Issue> = ast_issues.to_vec();

    for llm_issue in llm_issues {
        let duplicate = merged.iter_mut().find(|existing| {
            existing.line == llm_issue.line
                && similarity(&existing.message, &llm_issue.message) > SIMILARITY_THRESHOLD
        });

        match duplicate {
            Some(existing) => {
                existing
                    .suggestion
                    .push_str(&format!(" (LLM: {})", llm_issue.suggestion));
                existing.source = IssueSource::AstLlm;
            }
            None => merged.push(llm_issue.clone()),
        }
    }

    merged.sort_by_key(|issue| (issue.severity.rank(), issue.line));
    merged
}

/// Jaccard index over lowercase whitespace-tokenized word sets.
///
/// 0.0 when either message has no tokens.
pub fn similarity(a: &str, b: &str) -> f64 {
    use std::collections::HashSet;

    let words_a: HashSet<String> = a.to_lowercase().split_whitespace().map(String::from).collect();
    let words_b: HashSet<String> = b.to_lowercase().split_whitespace().map(String::from).collect();

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}
