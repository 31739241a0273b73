//! Reply parsing for the external reviewer.
//!
//! Tiers, in order: a fenced JSON block if present, else the raw reply as
//! JSON, else a textual "Line N:" extractor. The textual tier is
//! deliberately heuristic; models cannot be forced to emit valid JSON.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::issue::{Issue, IssueSource, Severity};

/// Fallback messages are truncated to keep issues scannable.
const MAX_FALLBACK_MESSAGE_CHARS: usize = 200;

lazy_static! {
    static ref FENCED_JSON_RE: Regex =
        Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap();
    static ref LINE_MARKER_RE: Regex = Regex::new(r"(?i)line\s+(\d+)[:.\s]+").unwrap();
}

#[derive(Debug, Deserialize)]
struct ReviewPayload {
    #[serde(default)]
    issues: Vec<RawIssue>,
}

/// One element of the reply's `issues` array; every field is optional and
/// defaulted, since the model routinely drops some.
#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(default)]
    line: i64,
    #[serde(default = "default_severity")]
    severity: String,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    suggestion: String,
    #[serde(default)]
    reasoning: String,
}

fn default_severity() -> String {
    "info".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

/// Parse a raw backend reply into issues.
///
/// Never fails; an unusable reply produces an empty list.
pub fn parse_reply(reply: &str, source: &str) -> Vec<Issue> {
    // If the reply wraps its JSON in a fence, only the fenced block is
    // considered from here on, including by the textual fallback.
    let candidate = FENCED_JSON_RE
        .captures(reply)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(reply);

    match serde_json::from_str::<ReviewPayload>(candidate) {
        Ok(payload) => structured_issues(payload, source),
        Err(_) => extract_from_text(candidate),
    }
}

fn structured_issues(payload: ReviewPayload, source: &str) -> Vec<Issue> {
    let line_count = source.split('\n').count() as i64;

    payload
        .issues
        .into_iter()
        .map(|raw| {
            // A hallucinated out-of-range line must not corrupt
            // line-keyed merging downstream.
            let line = if raw.line < 1 || raw.line > line_count {
                1
            } else {
                raw.line as usize
            };

            Issue {
                line,
                column: 0,
                severity: Severity::from(raw.severity),
                category: raw.category,
                message: raw.message,
                suggestion: raw.suggestion,
                reasoning: raw.reasoning,
                source: IssueSource::Llm,
            }
        })
        .collect()
}

/// Scan free text for "line N:" markers; each marker's trailing text up to
/// the next marker or a blank line becomes one issue.
fn extract_from_text(text: &str) -> Vec<Issue> {
    let markers: Vec<(usize, usize, usize)> = LINE_MARKER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let line = caps.get(1)?.as_str().parse::<usize>().ok()?;
            Some((whole.end(), whole.start(), line))
        })
        .collect();

    let mut issues = Vec::new();

    for (i, &(content_start, _, line)) in markers.iter().enumerate() {
        let content_end = markers
            .get(i + 1)
            .map(|&(_, next_start, _)| next_start)
            .unwrap_or(text.len());

        let mut content = &text[content_start..content_end];
        if let Some(blank) = content.find("\n\n") {
            content = &content[..blank];
        }
        let content = content.trim();
        let message: String = content.chars().take(MAX_FALLBACK_MESSAGE_CHARS).collect();

        issues.push(Issue {
            line,
            column: 0,
            severity: infer_severity(content),
            category: "general".to_string(),
            message,
            suggestion: "See LLM feedback for details".to_string(),
            reasoning: String::new(),
            source: IssueSource::Llm,
        });
    }

    issues
}

fn infer_severity(content: &str) -> Severity {
    let lowered = content.to_lowercase();
    if ["error", "bug", "critical", "broken"]
        .iter()
        .any(|w| lowered.contains(w))
    {
        Severity::Error
    } else if ["warning", "potential", "should"]
        .iter()
        .any(|w| lowered.contains(w))
    {
        Severity::Warning
    } else {
        Severity::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "a = 1\nb = 2\nc = 3\nd = 4\ne = 5\nf = 6\ng = 7\nh = 8";

    #[test]
    fn test_plain_json_reply() {
        let reply = r#"{"issues": [{"line": 2, "severity": "error", "category": "logic",
            "message": "Division by zero", "suggestion": "Check b", "reasoning": "b may be 0"}]}"#;
        let issues = parse_reply(reply, SOURCE);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].source, IssueSource::Llm);
        assert_eq!(issues[0].reasoning, "b may be 0");
    }

    #[test]
    fn test_fenced_json_reply() {
        let reply = "Here is my review:\n```json\n{\"issues\": [{\"line\": 3, \"message\": \"suspect\"}]}\n```\nThanks!";
        let issues = parse_reply(reply, SOURCE);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 3);
        // Missing fields take defaults.
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(issues[0].category, "general");
        assert_eq!(issues[0].suggestion, "");
    }

    #[test]
    fn test_out_of_range_lines_clamped() {
        let reply = r#"{"issues": [
            {"line": 0, "message": "below"},
            {"line": -4, "message": "negative"},
            {"line": 999, "message": "beyond"}
        ]}"#;
        let issues = parse_reply(reply, SOURCE);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.line == 1));
    }

    #[test]
    fn test_unknown_severity_preserved() {
        let reply = r#"{"issues": [{"line": 1, "severity": "blocker", "message": "x"}]}"#;
        let issues = parse_reply(reply, SOURCE);
        assert_eq!(issues[0].severity, Severity::Other("blocker".to_string()));
    }

    #[test]
    fn test_text_fallback_single_marker() {
        let reply = "I could not produce JSON.\nLine 7: possible bug here\n";
        let issues = parse_reply(reply, SOURCE);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 7);
        // "bug" outranks "possible".
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].category, "general");
        assert_eq!(issues[0].message, "possible bug here");
        assert_eq!(issues[0].suggestion, "See LLM feedback for details");
    }

    #[test]
    fn test_text_fallback_multiple_markers_and_blank_line() {
        let reply = "Line 2: should validate input\nLine 5: this looks fine\n\ntrailing prose";
        let issues = parse_reply(reply, SOURCE);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[1].line, 5);
        assert_eq!(issues[1].severity, Severity::Info);
        assert_eq!(issues[1].message, "this looks fine");
    }

    #[test]
    fn test_text_fallback_case_insensitive() {
        let reply = "LINE 3: critical failure in handler";
        let issues = parse_reply(reply, SOURCE);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_fallback_message_truncated() {
        let long = "x".repeat(500);
        let reply = format!("Line 4: {}", long);
        let issues = parse_reply(&reply, SOURCE);
        assert_eq!(issues[0].message.chars().count(), 200);
    }

    #[test]
    fn test_garbage_reply_yields_nothing() {
        assert!(parse_reply("I refuse to review this code.", SOURCE).is_empty());
        assert!(parse_reply("", SOURCE).is_empty());
    }

    #[test]
    fn test_invalid_fenced_block_falls_back_within_fence() {
        // Fence found but not valid JSON: the fallback scans the fenced
        // text only, mirroring the reference behavior.
        let reply = "```json\n{ broken json, Line 6: bad parse here }\n```\nLine 2: outside fence";
        let issues = parse_reply(reply, SOURCE);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 6);
    }
}
