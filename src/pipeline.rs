//! Analysis pipeline orchestration.
//!
//! Tree analysis always runs; the external review runs when requested and
//! a reviewer is configured; the merger runs only when the review actually
//! produced a second opinion to fold in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analyzer::Analyzer;
use crate::config::ReviewerConfig;
use crate::issue::{Issue, Severity};
use crate::merge::merge;
use crate::review::LlmReviewer;

/// Aggregated counts over a final issue list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_issues: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub categories: BTreeMap<String, usize>,
}

impl Summary {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Summary {
            total_issues: issues.len(),
            ..Default::default()
        };

        for issue in issues {
            match issue.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.info += 1,
                Severity::Other(_) => {}
            }
            *summary.categories.entry(issue.category.clone()).or_insert(0) += 1;
        }

        summary
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub issues: Vec<Issue>,
    pub summary: Summary,
    /// Whether the external reviewer contributed to this report.
    pub llm_used: bool,
    pub code_lines: usize,
}

/// Orchestrates the analyzer, the optional reviewer, and the merger.
pub struct ReviewService {
    analyzer: Analyzer,
    reviewer: Option<LlmReviewer>,
}

impl ReviewService {
    /// Build the service; an unusable reviewer config (e.g. a provider
    /// that needs a credential without one) degrades to analysis-only
    /// with a warning rather than failing.
    pub fn new(reviewer_config: Option<ReviewerConfig>) -> Self {
        let reviewer = reviewer_config.and_then(|config| match LlmReviewer::new(config) {
            Ok(reviewer) => Some(reviewer),
            Err(e) => {
                eprintln!("Warning: LLM reviewer disabled: {}", e);
                None
            }
        });

        Self {
            analyzer: Analyzer::new(),
            reviewer,
        }
    }

    pub fn reviewer_available(&self) -> bool {
        self.reviewer.is_some()
    }

    /// Run the full pipeline over one source unit.
    ///
    /// The reviewer call blocks on network I/O; everything else is pure
    /// computation. Each call uses a fresh analysis session.
    pub fn run(
        &self,
        source: &str,
        use_llm: bool,
        focus_areas: Option<&[String]>,
    ) -> anyhow::Result<Report> {
        let ast_issues = self.analyzer.analyze(source);

        let (issues, llm_used) = match &self.reviewer {
            Some(reviewer) if use_llm => {
                let runtime = tokio::runtime::Runtime::new()?;
                let llm_issues =
                    runtime.block_on(reviewer.review(source, &ast_issues, focus_areas));
                (merge(&ast_issues, &llm_issues), true)
            }
            _ => (ast_issues, false),
        };

        let summary = Summary::from_issues(&issues);

        Ok(Report {
            code_lines: source.split('\n').count(),
            issues,
            summary,
            llm_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueSource;

    #[test]
    fn test_summary_counts() {
        let issues = vec![
            Issue {
                line: 1,
                column: 1,
                severity: Severity::Error,
                category: "logic".to_string(),
                message: "m".to_string(),
                suggestion: String::new(),
                reasoning: String::new(),
                source: IssueSource::Ast,
            },
            Issue {
                line: 2,
                column: 1,
                severity: Severity::Warning,
                category: "logic".to_string(),
                message: "m".to_string(),
                suggestion: String::new(),
                reasoning: String::new(),
                source: IssueSource::Ast,
            },
            Issue {
                line: 3,
                column: 0,
                severity: Severity::Info,
                category: "unused".to_string(),
                message: "m".to_string(),
                suggestion: String::new(),
                reasoning: String::new(),
                source: IssueSource::Llm,
            },
        ];

        let summary = Summary::from_issues(&issues);
        assert_eq!(summary.total_issues, 3);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.info, 1);
        assert_eq!(summary.categories["logic"], 2);
        assert_eq!(summary.categories["unused"], 1);
    }

    #[test]
    fn test_static_only_run() {
        let service = ReviewService::new(None);
        assert!(!service.reviewer_available());

        let report = service
            .run("def f():\n    return 1\n    print('dead')\n", false, None)
            .unwrap();
        assert!(!report.llm_used);
        assert_eq!(report.summary.errors, 1);
        assert!(report
            .issues
            .iter()
            .any(|i| i.message.contains("Unreachable")));
        assert_eq!(report.code_lines, 4);
    }

    #[test]
    fn test_use_llm_without_reviewer_degrades() {
        let service = ReviewService::new(None);
        let report = service.run("x = 1\nprint(x)\n", true, None).unwrap();
        assert!(!report.llm_used);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_unusable_reviewer_config_degrades() {
        use crate::config::{LlmProvider, ReviewerConfig};

        // Anthropic without a key cannot build a reviewer.
        let service = ReviewService::new(Some(ReviewerConfig::new(LlmProvider::Anthropic)));
        assert!(!service.reviewer_available());
    }
}
