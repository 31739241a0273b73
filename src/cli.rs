//! Command-line interface for codecritic.

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{LlmProvider, ReviewerConfig};
use crate::pipeline::ReviewService;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ISSUES: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Input bound, enforced here rather than in the core.
pub const MAX_SOURCE_CHARS: usize = 50_000;

/// Static Python code analyzer with optional LLM-assisted second review.
///
/// Codecritic walks the syntax tree of a single Python source unit to
/// detect structural defects (unreachable code, inconsistent returns,
/// suspicious conditionals, unused bindings) and can fold in a second
/// opinion from a generative-text backend, merged into one ranked list.
#[derive(Parser)]
#[command(name = "codecritic")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a Python source file
    #[command(visible_alias = "check")]
    Analyze(AnalyzeArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// File to analyze, or "-" for stdin
    pub path: PathBuf,

    /// Ask the configured LLM backend for a second review
    #[arg(long)]
    pub llm: bool,

    /// Comma-separated focus areas forwarded to the reviewer
    /// (e.g. security,performance)
    #[arg(long, value_delimiter = ',')]
    pub focus: Vec<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Reviewer provider: anthropic, openai, or local
    /// (default: LLM_PROVIDER environment variable)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model override for the reviewer backend
    #[arg(long)]
    pub model: Option<String>,

    /// Endpoint override for the reviewer backend
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        anyhow::bail!("invalid format '{}' (expected pretty or json)", args.format);
    }

    let (source, label) = read_source(args)?;

    if source.trim().is_empty() {
        anyhow::bail!("source is empty");
    }
    if source.chars().count() > MAX_SOURCE_CHARS {
        anyhow::bail!(
            "source exceeds maximum length of {} characters",
            MAX_SOURCE_CHARS
        );
    }

    let service = ReviewService::new(reviewer_config(args)?);
    if args.llm && !service.reviewer_available() {
        eprintln!("Warning: no LLM backend configured, running static analysis only");
    }

    let focus = if args.focus.is_empty() {
        None
    } else {
        Some(args.focus.as_slice())
    };

    let report = service.run(&source, args.llm, focus)?;

    match args.format.as_str() {
        "json" => report::write_json(&label, &report)?,
        _ => report::write_pretty(&label, &report),
    }

    if report.summary.errors > 0 {
        Ok(EXIT_ISSUES)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

fn read_source(args: &AnalyzeArgs) -> anyhow::Result<(String, String)> {
    if args.path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok((buffer, "stdin".to_string()))
    } else {
        let source = std::fs::read_to_string(&args.path)?;
        Ok((source, args.path.display().to_string()))
    }
}

/// Resolve the reviewer configuration from flags and environment.
///
/// Flags override the environment; without a usable credential the
/// pipeline runs in tree-analysis-only mode.
fn reviewer_config(args: &AnalyzeArgs) -> anyhow::Result<Option<ReviewerConfig>> {
    let mut config = match &args.provider {
        Some(name) => {
            let provider =
                LlmProvider::from_str(name).map_err(|e| anyhow::anyhow!(e))?;
            let mut config = ReviewerConfig::new(provider);
            config.api_key = std::env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());
            Some(config)
        }
        None => ReviewerConfig::from_env(),
    };

    if let Some(ref mut config) = config {
        if let Some(ref model) = args.model {
            config.model = Some(model.clone());
        }
        if let Some(ref endpoint) = args.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args_for(path: &std::path::Path) -> AnalyzeArgs {
        AnalyzeArgs {
            path: path.to_path_buf(),
            llm: false,
            focus: Vec::new(),
            format: "json".to_string(),
            provider: None,
            model: None,
            endpoint: None,
        }
    }

    #[test]
    fn test_clean_file_exits_zero() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x = 1").unwrap();
        writeln!(file, "print(x)").unwrap();

        let code = run_analyze(&args_for(file.path())).unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[test]
    fn test_error_issues_exit_one() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "def f():").unwrap();
        writeln!(file, "    return 1").unwrap();
        writeln!(file, "    print('dead')").unwrap();

        let code = run_analyze(&args_for(file.path())).unwrap();
        assert_eq!(code, EXIT_ISSUES);
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = NamedTempFile::new().unwrap();
        assert!(run_analyze(&args_for(file.path())).is_err());
    }

    #[test]
    fn test_oversized_input_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "x = 1\n{}", "# padding\n".repeat(6000)).unwrap();

        assert!(run_analyze(&args_for(file.path())).is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x = 1").unwrap();

        let mut args = args_for(file.path());
        args.format = "xml".to_string();
        assert!(run_analyze(&args).is_err());
    }

    #[test]
    fn test_invalid_provider_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x = 1").unwrap();

        let mut args = args_for(file.path());
        args.provider = Some("bedrock".to_string());
        assert!(run_analyze(&args).is_err());
    }
}
