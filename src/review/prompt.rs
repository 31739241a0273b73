//! Prompt construction for the external reviewer.

use crate::issue::Issue;

/// Prior findings included in the prompt are capped to keep it bounded.
const MAX_PRIOR_ISSUES: usize = 10;

/// Build the single-shot review prompt.
///
/// The reply contract is pure JSON matching a fixed schema; the parser
/// still tolerates fenced blocks and free text (see `parse`).
pub fn build_prompt(source: &str, prior_issues: &[Issue], focus_areas: Option<&[String]>) -> String {
    let mut static_context = String::new();
    if !prior_issues.is_empty() {
        static_context.push_str("Static analysis found these issues:\n");
        for issue in prior_issues.iter().take(MAX_PRIOR_ISSUES) {
            static_context.push_str(&format!("- Line {}: {}\n", issue.line, issue.message));
        }
    }

    let focus_text = match focus_areas {
        Some(areas) if !areas.is_empty() => {
            format!("\nPay special attention to: {}", areas.join(", "))
        }
        _ => String::new(),
    };

    format!(
        r#"You are an expert code reviewer. Analyze the following Python code for:

1. **Logic errors**: Bugs, incorrect algorithms, edge cases not handled
2. **Bad practices**: Anti-patterns, code smells, maintainability issues
3. **Security vulnerabilities**: SQL injection, XSS, insecure data handling
4. **Performance issues**: Inefficient algorithms, unnecessary operations
5. **Missing edge cases**: Null checks, boundary conditions, error handling

{static_context}

{focus_text}

Please provide feedback in the following JSON format:
{{
  "issues": [
    {{
      "line": <line_number>,
      "severity": "error|warning|info",
      "category": "logic|security|performance|style|edge_case",
      "message": "Brief description of the issue",
      "suggestion": "Specific recommendation to fix",
      "reasoning": "Why this is an issue"
    }}
  ]
}}

Code to review:

```python
{source}
```

Provide only valid JSON in your response, no additional text."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{IssueSource, Severity};

    fn issue(line: usize, message: &str) -> Issue {
        Issue {
            line,
            column: 0,
            severity: Severity::Warning,
            category: "logic".to_string(),
            message: message.to_string(),
            suggestion: String::new(),
            reasoning: String::new(),
            source: IssueSource::Ast,
        }
    }

    #[test]
    fn test_prompt_embeds_source_and_persona() {
        let prompt = build_prompt("def f():\n    pass\n", &[], None);
        assert!(prompt.contains("expert code reviewer"));
        assert!(prompt.contains("```python\ndef f():\n    pass\n\n```"));
        assert!(prompt.contains("only valid JSON"));
        assert!(!prompt.contains("Static analysis found"));
    }

    #[test]
    fn test_prior_issues_capped_at_ten() {
        let issues: Vec<Issue> = (1..=15).map(|i| issue(i, "finding")).collect();
        let prompt = build_prompt("x = 1", &issues, None);
        assert!(prompt.contains("- Line 10: finding"));
        assert!(!prompt.contains("- Line 11: finding"));
    }

    #[test]
    fn test_focus_areas_clause() {
        let areas = vec!["security".to_string(), "performance".to_string()];
        let prompt = build_prompt("x = 1", &[], Some(&areas));
        assert!(prompt.contains("Pay special attention to: security, performance"));

        let prompt = build_prompt("x = 1", &[], Some(&[]));
        assert!(!prompt.contains("Pay special attention"));
    }
}
