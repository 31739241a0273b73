//! Output formatting for analysis reports.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::issue::{Issue, Severity};
use crate::pipeline::{Report, Summary};

/// Top-level JSON report structure.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub source: String,
    pub summary: Summary,
    pub issues: Vec<Issue>,
    pub llm_used: bool,
    pub code_lines: usize,
}

/// Write a report as pretty-printed JSON to stdout.
pub fn write_json(source_label: &str, report: &Report) -> anyhow::Result<()> {
    let json_report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: source_label.to_string(),
        summary: report.summary.clone(),
        issues: report.issues.clone(),
        llm_used: report.llm_used,
        code_lines: report.code_lines,
    };

    let json = serde_json::to_string_pretty(&json_report)?;
    println!("{}", json);
    Ok(())
}

/// Write a report in human-readable form to stdout.
pub fn write_pretty(source_label: &str, report: &Report) {
    println!();
    print!("  ");
    print!("{}", "codecritic".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Source: ".dimmed());
    println!("{} ({} lines)", source_label, report.code_lines);
    if report.llm_used {
        print!("  {}", "Review: ".dimmed());
        println!("static analysis + LLM");
    }
    println!();

    write_summary(&report.summary);
    println!();

    if !report.issues.is_empty() {
        write_issues(&report.issues);
        println!();
    }

    if report.summary.errors > 0 {
        println!("  {}", "✗ issues need attention".red());
    } else if report.summary.total_issues > 0 {
        println!("  {}", "✓ no errors".green());
    } else {
        println!("  {}", "✓ clean".green());
    }
    println!();
}

fn write_summary(summary: &Summary) {
    print!("  {} issue(s)", summary.total_issues);
    if summary.total_issues > 0 {
        print!(
            "  ({} {}, {} {}, {} {})",
            summary.errors,
            "errors".red(),
            summary.warnings,
            "warnings".yellow(),
            summary.info,
            "info".blue()
        );
    }
    println!();

    if !summary.categories.is_empty() {
        let tally: Vec<String> = summary
            .categories
            .iter()
            .map(|(category, count)| format!("{}: {}", category, count))
            .collect();
        println!("  {}{}", "Categories: ".dimmed(), tally.join(", "));
    }
}

fn write_issues(issues: &[Issue]) {
    println!("  {}", "Issues".bold());

    for issue in issues {
        print!("  ");
        write_severity_tag(&issue.severity);

        if issue.line > 0 {
            print!(" {}", format!("line {}", issue.line).bold());
            if issue.column > 0 {
                print!(":{}", issue.column);
            }
        }
        print!("  {}", format!("[{}]", issue.category).dimmed());
        print!("  {}", format!("({})", issue.source).dimmed());
        println!();

        println!("      {}", issue.message);
        if !issue.suggestion.is_empty() {
            println!("      {} {}", "→".dimmed(), issue.suggestion.dimmed());
        }
        if !issue.reasoning.is_empty() {
            println!("      {} {}", "reasoning:".dimmed(), issue.reasoning.dimmed());
        }
    }
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::Error => print!("{}", "ERROR".red().bold()),
        Severity::Warning => print!("{}", "WARN ".yellow().bold()),
        Severity::Info => print!("{}", "INFO ".blue()),
        Severity::Other(tag) => print!("{}", tag.to_uppercase().magenta()),
    }
}
