//! Codecritic - static Python analysis with an optional LLM second opinion.
//!
//! Codecritic walks the syntax tree of one self-contained Python source
//! unit to detect structural defects: unreachable code, inconsistent
//! returns, suspicious conditionals, and unused bindings. A configured
//! generative-text backend can contribute a second review, which is merged
//! and deduplicated with the tree analyzer's findings into one ranked
//! issue list.
//!
//! # Architecture
//!
//! - `analyzer`: tree-sitter based single-pass syntax tree analyzer
//! - `review`: external reviewer adapter (Anthropic, OpenAI, local)
//! - `merge`: similarity-based deduplication across the two issue sources
//! - `pipeline`: orchestration and summary aggregation
//! - `issue`: the shared issue record
//! - `config`: reviewer backend configuration
//! - `report`: output formatting (pretty, JSON)
//! - `cli`: command-line surface
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────┐    ┌───────────────┐    ┌──────────────┐    ┌────────┐
//! │ Source   │───▶│ Tree Analyzer │───▶│ LLM Reviewer │───▶│ Merger │
//! └──────────┘    │ (always)      │    │ (optional)   │    └────────┘
//!                 └───────────────┘    └──────────────┘
//! ```
//!
//! The analyzer never fails outward: malformed input degrades to a single
//! syntax issue. The reviewer never fails the pipeline: transport or parse
//! failures degrade to tree-analysis-only results.

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod issue;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod review;

pub use analyzer::Analyzer;
pub use config::{LlmProvider, ReviewerConfig};
pub use issue::{Issue, IssueSource, Severity};
pub use merge::merge;
pub use pipeline::{Report, ReviewService, Summary};
pub use review::{LlmReviewer, ReviewError};
