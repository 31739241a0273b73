//! Tree-sitter based static analyzer for a single Python source unit.
//!
//! The analyzer parses the source, walks the tree once collecting issues
//! and symbol-usage facts, then runs post-walk checks for unused imports
//! and variables. It never fails outward: malformed input degrades to a
//! single `syntax` issue, any internal fault to a single `parsing` issue.

mod session;
mod visit;

use tree_sitter::{Language, Node, Parser};

use crate::issue::{Issue, IssueSource, Severity};
use session::Session;

/// Static analyzer over Python syntax trees.
///
/// The analyzer itself is stateless; each `analyze` call builds a fresh
/// [`Session`] so no traversal state survives between calls.
pub struct Analyzer {
    language: Language,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Analyze one source unit, returning issues sorted by (line, column).
    ///
    /// Always returns a list: a syntax error yields exactly one
    /// `error`/`syntax` issue, any other parsing fault exactly one
    /// `error`/`parsing` issue.
    pub fn analyze(&self, source: &str) -> Vec<Issue> {
        match self.try_analyze(source) {
            Ok(issues) => issues,
            Err(e) => vec![Issue {
                line: 0,
                column: 0,
                severity: Severity::Error,
                category: "parsing".to_string(),
                message: format!("Failed to parse code: {}", e),
                suggestion: "Ensure the code is valid Python".to_string(),
                reasoning: String::new(),
                source: IssueSource::Ast,
            }],
        }
    }

    fn try_analyze(&self, source: &str) -> anyhow::Result<Vec<Issue>> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("parser produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Ok(vec![syntax_issue(root)]);
        }

        let mut session = Session::new();
        visit::walk(&mut session, root, source.as_bytes());
        Ok(session.finish())
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the single issue reported for malformed input, located at the
/// first ERROR or MISSING node in the tree.
fn syntax_issue(root: Node) -> Issue {
    let (line, column, detail) = match find_error_node(root) {
        Some(node) => {
            let pos = node.start_position();
            let detail = if node.is_missing() {
                format!("missing {}", node.kind())
            } else {
                "invalid syntax".to_string()
            };
            (pos.row + 1, pos.column + 1, detail)
        }
        None => (0, 0, "invalid syntax".to_string()),
    };

    Issue {
        line,
        column,
        severity: Severity::Error,
        category: "syntax".to_string(),
        message: format!("Syntax error: {}", detail),
        suggestion: "Fix the syntax error before proceeding".to_string(),
        reasoning: String::new(),
        source: IssueSource::Ast,
    }
}

fn find_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(find_error_node)
}
