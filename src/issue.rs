//! Core types for analysis results.

use serde::{Deserialize, Serialize};

/// Severity levels for issues.
///
/// The external reviewer is free to invent severity tags beyond the three
/// known levels; those are preserved verbatim and rank after `Info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Other(String),
}

impl Severity {
    /// Rank used for sorting: error < warning < info < anything else.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
            Severity::Other(_) => 3,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            "info" => Severity::Info,
            _ => Severity::Other(s),
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        Severity::from(s.to_string())
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        s.as_str().to_string()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which analysis path produced or corroborated an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSource {
    #[serde(rename = "ast")]
    Ast,
    #[serde(rename = "llm")]
    Llm,
    /// Set only by the merger, when an LLM finding is folded into an
    /// existing AST finding on the same line.
    #[serde(rename = "ast+llm")]
    AstLlm,
}

impl IssueSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSource::Ast => "ast",
            IssueSource::Llm => "llm",
            IssueSource::AstLlm => "ast+llm",
        }
    }
}

impl std::fmt::Display for IssueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detected issue.
///
/// `line` and `column` are 1-based; both are 0 when the issue has no
/// specific location (whole-unit findings such as unused variables).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    /// Open tag set: `syntax`, `logic`, `style`, `best_practice`,
    /// `unused`, `general`, plus whatever the reviewer comes up with.
    pub category: String,
    pub message: String,
    #[serde(default)]
    pub suggestion: String,
    /// Free-text justification; only the LLM path populates this.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reasoning: String,
    pub source: IssueSource,
}
