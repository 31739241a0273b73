//! Single-pass tree walk with per-node-kind checks.
//!
//! The walk is pre-order: a node's own checks run before its children are
//! visited. Dispatch is a single match over tree-sitter node kinds; each
//! arm decides which children participate in name tracking, so identifiers
//! in non-expression positions (parameter names, attribute names, import
//! clauses) never pollute the defined/used sets.

use tree_sitter::Node;

use super::session::Session;
use crate::issue::{Issue, IssueSource, Severity};

fn text<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

fn line(node: Node) -> usize {
    node.start_position().row + 1
}

fn column(node: Node) -> usize {
    node.start_position().column + 1
}

/// Literal constants as they appear in Python conditions.
fn is_constant(kind: &str) -> bool {
    matches!(
        kind,
        "true" | "false" | "none" | "integer" | "float" | "string" | "concatenated_string"
    )
}

/// `while True:` — the original analyzer matches on truthiness, so the
/// integer literal 1 counts as well.
fn is_literal_true(node: Node, src: &[u8]) -> bool {
    match node.kind() {
        "true" => true,
        "integer" => text(node, src) == "1",
        _ => false,
    }
}

pub(crate) fn walk(session: &mut Session, node: Node, src: &[u8]) {
    match node.kind() {
        // Import clauses bind names without reading any; their identifier
        // children are not usage and must not be descended into.
        "import_statement" => {
            record_plain_imports(session, node, src);
        }
        "import_from_statement" => {
            record_from_imports(session, node, src);
        }

        "function_definition" => {
            visit_function(session, node, src);
        }

        "return_statement" => {
            session.record_return(node.named_child_count() > 0);
            walk_named_children(session, node, src);
        }

        "if_statement" | "elif_clause" => {
            check_condition(session, node, src);
            walk_named_children(session, node, src);
        }

        "while_statement" => {
            check_while(session, node, src);
            walk_named_children(session, node, src);
        }

        "except_clause" => {
            check_except(session, node);
            walk_named_children(session, node, src);
        }

        "assignment" | "augmented_assignment" => {
            if let Some(left) = node.child_by_field_name("left") {
                bind_targets(session, left, src);
            }
            if let Some(annotation) = node.child_by_field_name("type") {
                walk(session, annotation, src);
            }
            if let Some(right) = node.child_by_field_name("right") {
                walk(session, right, src);
            }
        }

        "for_statement" | "for_in_clause" => {
            if let Some(left) = node.child_by_field_name("left") {
                bind_targets(session, left, src);
            }
            if let Some(right) = node.child_by_field_name("right") {
                walk(session, right, src);
            }
            if let Some(body) = node.child_by_field_name("body") {
                walk(session, body, src);
            }
            if let Some(alternative) = node.child_by_field_name("alternative") {
                walk(session, alternative, src);
            }
        }

        // Walrus: `(n := expr)` binds n and evaluates expr.
        "named_expression" => {
            if let Some(name) = node.child_by_field_name("name") {
                bind_targets(session, name, src);
            }
            if let Some(value) = node.child_by_field_name("value") {
                walk(session, value, src);
            }
        }

        // `del x` neither defines nor reads x, but `del d[k]` reads d and k.
        "delete_statement" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if child.kind() != "identifier" {
                    walk(session, child, src);
                }
            }
        }

        // `with open(p) as f:` / `except E as e:` — the alias is a binding,
        // the guarded expression is ordinary usage.
        "as_pattern" => {
            if let Some(value) = node.named_child(0) {
                walk(session, value, src);
            }
            if let Some(alias) = node.child_by_field_name("alias") {
                bind_targets(session, alias, src);
            }
        }

        // Only the object side of an attribute access is a name read;
        // `os.path` reads `os`, not `path`.
        "attribute" => {
            if let Some(object) = node.child_by_field_name("object") {
                walk(session, object, src);
            }
        }

        // Keyword-argument names are formal, not variable reads.
        "keyword_argument" => {
            if let Some(value) = node.child_by_field_name("value") {
                walk(session, value, src);
            }
        }

        "class_definition" => {
            if let Some(superclasses) = node.child_by_field_name("superclasses") {
                walk(session, superclasses, src);
            }
            if let Some(body) = node.child_by_field_name("body") {
                walk(session, body, src);
            }
        }

        "lambda" => {
            if let Some(params) = node.child_by_field_name("parameters") {
                walk_parameters(session, params, src);
            }
            if let Some(body) = node.child_by_field_name("body") {
                walk(session, body, src);
            }
        }

        // Name lists in global/nonlocal are declarations, not reads.
        "global_statement" | "nonlocal_statement" => {}

        "identifier" => {
            session.mark_used(text(node, src));
        }

        _ => walk_named_children(session, node, src),
    }
}

fn walk_named_children(session: &mut Session, node: Node, src: &[u8]) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk(session, child, src);
    }
}

/// `import os, sys as system` — records `os` and `system`.
fn record_plain_imports(session: &mut Session, node: Node, src: &[u8]) {
    let mut cursor = node.walk();
    for name_node in node.children_by_field_name("name", &mut cursor) {
        match name_node.kind() {
            "dotted_name" => session.import(text(name_node, src)),
            "aliased_import" => {
                if let Some(alias) = name_node.child_by_field_name("alias") {
                    session.import(text(alias, src));
                }
            }
            _ => {}
        }
    }
}

/// `from mod import a, b as c` — records `a` and `c`, never `mod`.
fn record_from_imports(session: &mut Session, node: Node, src: &[u8]) {
    let mut cursor = node.walk();
    for name_node in node.children_by_field_name("name", &mut cursor) {
        match name_node.kind() {
            "dotted_name" => session.import(text(name_node, src)),
            "aliased_import" => {
                if let Some(alias) = name_node.child_by_field_name("alias") {
                    session.import(text(alias, src));
                }
            }
            _ => {}
        }
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "wildcard_import" {
            session.import("*");
        }
    }
}

/// Record assignment targets as defined names.
///
/// Only plain identifiers (and tuple/list patterns of them) are bindings.
/// Subscript and attribute targets read their base expression instead:
/// `a[i] = v` uses `a` and `i`, it does not define anything.
fn bind_targets(session: &mut Session, node: Node, src: &[u8]) {
    match node.kind() {
        "identifier" => session.define(text(node, src)),
        "pattern_list" | "tuple_pattern" | "list_pattern" | "list_splat_pattern"
        | "as_pattern_target" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                bind_targets(session, child, src);
            }
        }
        _ => walk(session, node, src),
    }
}

fn visit_function(session: &mut Session, node: Node, src: &[u8]) {
    let name = node
        .child_by_field_name("name")
        .map(|n| text(n, src).to_string())
        .unwrap_or_default();

    session.define(&name);
    session.function_returns.entry(name.clone()).or_default();

    let body = node.child_by_field_name("body");
    if let Some(body) = body {
        check_unreachable(session, body);
    }

    // Save/restore so returns after a nested def still attribute to the
    // enclosing function.
    let previous = session.current_function.replace(name.clone());

    if let Some(params) = node.child_by_field_name("parameters") {
        walk_parameters(session, params, src);
    }
    if let Some(return_type) = node.child_by_field_name("return_type") {
        walk(session, return_type, src);
    }
    if let Some(body) = body {
        walk(session, body, src);
    }

    session.current_function = previous;

    check_return_consistency(session, &name, line(node), column(node));
}

/// Parameter names are formal bindings outside the defined/used tracking,
/// but their annotations and default values are ordinary expressions.
fn walk_parameters(session: &mut Session, params: Node, src: &[u8]) {
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "identifier" | "list_splat_pattern" | "dictionary_splat_pattern" => {}
            "typed_parameter" => {
                if let Some(annotation) = param.child_by_field_name("type") {
                    walk(session, annotation, src);
                }
            }
            "default_parameter" => {
                if let Some(value) = param.child_by_field_name("value") {
                    walk(session, value, src);
                }
            }
            "typed_default_parameter" => {
                if let Some(annotation) = param.child_by_field_name("type") {
                    walk(session, annotation, src);
                }
                if let Some(value) = param.child_by_field_name("value") {
                    walk(session, value, src);
                }
            }
            _ => {}
        }
    }
}

/// Statements in a function's immediate body that follow a return/raise.
///
/// Only the top-level statement sequence is scanned; dead code in nested
/// blocks is attributed to the block's own function when walked.
fn check_unreachable(session: &mut Session, body: Node) {
    let mut cursor = body.walk();
    let statements: Vec<Node> = body
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect();

    for (i, stmt) in statements.iter().enumerate() {
        if matches!(stmt.kind(), "return_statement" | "raise_statement")
            && i + 1 < statements.len()
        {
            let next = statements[i + 1];
            session.push(Issue {
                line: line(next),
                column: column(next),
                severity: Severity::Error,
                category: "logic".to_string(),
                message: "Unreachable code after return/raise".to_string(),
                suggestion: "Remove or move this code before the return/raise".to_string(),
                reasoning: String::new(),
                source: IssueSource::Ast,
            });
        }
    }
}

fn check_return_consistency(session: &mut Session, name: &str, def_line: usize, def_col: usize) {
    let returns = match session.function_returns.get(name) {
        Some(r) if !r.is_empty() => r,
        _ => return,
    };

    let any_value = returns.iter().any(|has| *has);
    let all_value = returns.iter().all(|has| *has);
    if any_value && !all_value {
        session.push(Issue {
            line: def_line,
            column: def_col,
            severity: Severity::Warning,
            category: "logic".to_string(),
            message: format!("Function '{}' has inconsistent return statements", name),
            suggestion: "Ensure all code paths return a value or all return None".to_string(),
            reasoning: String::new(),
            source: IssueSource::Ast,
        });
    }
}

fn check_condition(session: &mut Session, node: Node, src: &[u8]) {
    let condition = match node.child_by_field_name("condition") {
        Some(c) => c,
        None => return,
    };

    if is_constant(condition.kind()) {
        session.push(Issue {
            line: line(node),
            column: column(node),
            severity: Severity::Warning,
            category: "logic".to_string(),
            message: format!("Condition is always {}", text(condition, src)),
            suggestion: "Remove the if statement or fix the condition".to_string(),
            reasoning: String::new(),
            source: IssueSource::Ast,
        });
    }

    if condition.kind() == "comparison_operator" {
        let mut cursor = condition.walk();
        for comparator in condition.named_children(&mut cursor).skip(1) {
            if matches!(comparator.kind(), "true" | "false") {
                session.push(Issue {
                    line: line(node),
                    column: column(node),
                    severity: Severity::Warning,
                    category: "style".to_string(),
                    message: "Avoid comparing with True/False explicitly".to_string(),
                    suggestion: "Use 'if var:' instead of 'if var == True:'".to_string(),
                    reasoning: String::new(),
                    source: IssueSource::Ast,
                });
            }
        }
    }
}

fn check_while(session: &mut Session, node: Node, src: &[u8]) {
    let condition = match node.child_by_field_name("condition") {
        Some(c) => c,
        None => return,
    };

    if is_literal_true(condition, src) && !contains_break(node) {
        session.push(Issue {
            line: line(node),
            column: column(node),
            severity: Severity::Warning,
            category: "logic".to_string(),
            message: "Potential infinite loop without break statement".to_string(),
            suggestion: "Add a break condition or use a different loop structure".to_string(),
            reasoning: String::new(),
            source: IssueSource::Ast,
        });
    }
}

/// Whole-subtree break search, nested blocks included.
fn contains_break(node: Node) -> bool {
    if node.kind() == "break_statement" {
        return true;
    }
    let mut cursor = node.walk();
    let result = node.named_children(&mut cursor).any(contains_break);
    result
}

/// A handler with no exception type catches everything.
fn check_except(session: &mut Session, node: Node) {
    let mut cursor = node.walk();
    let bare = node
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")
        .map(|first| first.kind() == "block")
        .unwrap_or(false);

    if bare {
        session.push(Issue {
            line: line(node),
            column: column(node),
            severity: Severity::Warning,
            category: "best_practice".to_string(),
            message: "Bare except clause catches all exceptions".to_string(),
            suggestion: "Specify exception types or use 'except Exception:'".to_string(),
            reasoning: String::new(),
            source: IssueSource::Ast,
        });
    }
}
