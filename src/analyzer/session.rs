//! Per-call analysis session state.
//!
//! One `Session` is constructed for each `analyze` call and discarded when
//! the call returns. Nothing in here is shared between calls; stale symbol
//! state leaking across analyses would corrupt the unused-name checks.

use std::collections::{HashMap, HashSet};

use crate::issue::{Issue, IssueSource, Severity};

/// Python builtin names, kept sorted for binary search.
///
/// Assignments that shadow a builtin are not reported as unused variables.
static PYTHON_BUILTINS: &[&str] = &[
    "ArithmeticError",
    "AssertionError",
    "AttributeError",
    "BaseException",
    "BaseExceptionGroup",
    "BlockingIOError",
    "BrokenPipeError",
    "BufferError",
    "BytesWarning",
    "ChildProcessError",
    "ConnectionAbortedError",
    "ConnectionError",
    "ConnectionRefusedError",
    "ConnectionResetError",
    "DeprecationWarning",
    "EOFError",
    "Ellipsis",
    "EnvironmentError",
    "Exception",
    "ExceptionGroup",
    "False",
    "FileExistsError",
    "FileNotFoundError",
    "FloatingPointError",
    "FutureWarning",
    "GeneratorExit",
    "IOError",
    "ImportError",
    "ImportWarning",
    "IndentationError",
    "IndexError",
    "InterruptedError",
    "IsADirectoryError",
    "KeyError",
    "KeyboardInterrupt",
    "LookupError",
    "MemoryError",
    "ModuleNotFoundError",
    "NameError",
    "None",
    "NotADirectoryError",
    "NotImplemented",
    "NotImplementedError",
    "OSError",
    "OverflowError",
    "PendingDeprecationWarning",
    "PermissionError",
    "ProcessLookupError",
    "RecursionError",
    "ReferenceError",
    "ResourceWarning",
    "RuntimeError",
    "RuntimeWarning",
    "StopAsyncIteration",
    "StopIteration",
    "SyntaxError",
    "SyntaxWarning",
    "SystemError",
    "SystemExit",
    "TabError",
    "TimeoutError",
    "True",
    "TypeError",
    "UnboundLocalError",
    "UnicodeDecodeError",
    "UnicodeEncodeError",
    "UnicodeError",
    "UnicodeTranslateError",
    "UnicodeWarning",
    "UserWarning",
    "ValueError",
    "Warning",
    "ZeroDivisionError",
    "abs",
    "aiter",
    "all",
    "anext",
    "any",
    "ascii",
    "bin",
    "bool",
    "breakpoint",
    "bytearray",
    "bytes",
    "callable",
    "chr",
    "classmethod",
    "compile",
    "complex",
    "copyright",
    "credits",
    "delattr",
    "dict",
    "dir",
    "divmod",
    "enumerate",
    "eval",
    "exec",
    "exit",
    "filter",
    "float",
    "format",
    "frozenset",
    "getattr",
    "globals",
    "hasattr",
    "hash",
    "help",
    "hex",
    "id",
    "input",
    "int",
    "isinstance",
    "issubclass",
    "iter",
    "len",
    "license",
    "list",
    "locals",
    "map",
    "max",
    "memoryview",
    "min",
    "next",
    "object",
    "oct",
    "open",
    "ord",
    "pow",
    "print",
    "property",
    "quit",
    "range",
    "repr",
    "reversed",
    "round",
    "set",
    "setattr",
    "slice",
    "sorted",
    "staticmethod",
    "str",
    "sum",
    "super",
    "tuple",
    "type",
    "vars",
    "zip",
];

fn is_builtin(name: &str) -> bool {
    PYTHON_BUILTINS.binary_search(&name).is_ok()
}

/// Mutable state accumulated during one tree walk.
#[derive(Debug, Default)]
pub(crate) struct Session {
    pub issues: Vec<Issue>,
    pub defined_names: HashSet<String>,
    pub used_names: HashSet<String>,
    pub imported_names: HashSet<String>,
    pub used_imports: HashSet<String>,
    /// Function name -> has-value flag of each return statement in its body.
    pub function_returns: HashMap<String, Vec<bool>>,
    /// Innermost function currently being walked; None at module level.
    pub current_function: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn define(&mut self, name: &str) {
        self.defined_names.insert(name.to_string());
    }

    pub fn import(&mut self, name: &str) {
        self.imported_names.insert(name.to_string());
    }

    /// Record a name read. A read of an imported name also marks the
    /// import as used.
    pub fn mark_used(&mut self, name: &str) {
        self.used_names.insert(name.to_string());
        if self.imported_names.contains(name) {
            self.used_imports.insert(name.to_string());
        }
    }

    pub fn record_return(&mut self, has_value: bool) {
        if let Some(ref func) = self.current_function {
            self.function_returns
                .entry(func.clone())
                .or_default()
                .push(has_value);
        }
    }

    /// Run the post-walk checks and return the final, position-sorted list.
    pub fn finish(mut self) -> Vec<Issue> {
        self.check_unused_imports();
        self.check_unused_variables();

        // Stable sort keeps encounter order for same-position issues.
        self.issues.sort_by_key(|i| (i.line, i.column));
        self.issues
    }

    /// Imports never read anywhere in the unit.
    ///
    /// Per-alias positions are not tracked, so these are reported at a
    /// fixed line 1 / column 0 placeholder.
    fn check_unused_imports(&mut self) {
        let mut unused: Vec<&String> = self
            .imported_names
            .difference(&self.used_imports)
            .collect();
        unused.sort();

        for name in unused {
            self.issues.push(Issue {
                line: 1,
                column: 0,
                severity: Severity::Info,
                category: "unused".to_string(),
                message: format!("Imported '{}' is never used", name),
                suggestion: format!("Remove the import or use '{}' in your code", name),
                reasoning: String::new(),
                source: IssueSource::Ast,
            });
        }
    }

    /// Names assigned but never read, excluding builtins and the
    /// conventional `_`-prefixed throwaways.
    fn check_unused_variables(&mut self) {
        let mut unused: Vec<&String> = self
            .defined_names
            .difference(&self.used_names)
            .filter(|name| !name.starts_with('_') && !is_builtin(name))
            .collect();
        unused.sort();

        for name in unused {
            self.issues.push(Issue {
                line: 0,
                column: 0,
                severity: Severity::Info,
                category: "unused".to_string(),
                message: format!("Variable '{}' is defined but never used", name),
                suggestion: format!("Remove '{}' or use it in your code", name),
                reasoning: String::new(),
                source: IssueSource::Ast,
            });
        }
    }
}
