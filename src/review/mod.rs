//! External reviewer adapter.
//!
//! Sends the source plus the tree analyzer's findings to one configured
//! generative-text backend and parses the reply into structured issues:
//! - Anthropic messages API
//! - OpenAI chat completions
//! - a local HTTP endpoint (Ollama generate API)
//!
//! The backend is fixed at construction. Swapping backends changes only
//! the transport; prompt construction and reply parsing are shared.

mod anthropic;
mod local;
mod openai;
mod parse;
mod prompt;

use thiserror::Error;

use crate::config::{LlmProvider, ReviewerConfig};
use crate::issue::Issue;

/// Errors from the reviewer transport.
///
/// These never escape [`LlmReviewer::review`]; they surface only from
/// construction and from the internal request path.
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("no API key configured for provider {0}")]
    MissingCredential(LlmProvider),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("backend reply carried no content")]
    EmptyReply,
}

/// Client for one configured review backend.
pub struct LlmReviewer {
    http: reqwest::Client,
    config: ReviewerConfig,
}

impl LlmReviewer {
    /// Create a reviewer for the configured backend.
    ///
    /// Fails when the provider requires a credential and none is set; the
    /// caller is expected to degrade to tree-analysis-only.
    pub fn new(config: ReviewerConfig) -> Result<Self, ReviewError> {
        if config.provider.requires_credential() && config.api_key.is_none() {
            return Err(ReviewError::MissingCredential(config.provider));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("codecritic/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        Ok(Self { http, config })
    }

    pub fn provider(&self) -> LlmProvider {
        self.config.provider
    }

    /// Review the source, seeded with prior findings.
    ///
    /// Never fails outward: transport and parse failures are logged and
    /// yield an empty list, degrading the pipeline to tree-analysis-only
    /// results for this call.
    pub async fn review(
        &self,
        source: &str,
        prior_issues: &[Issue],
        focus_areas: Option<&[String]>,
    ) -> Vec<Issue> {
        match self.request_review(source, prior_issues, focus_areas).await {
            Ok(issues) => issues,
            Err(e) => {
                eprintln!("Warning: LLM review failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn request_review(
        &self,
        source: &str,
        prior_issues: &[Issue],
        focus_areas: Option<&[String]>,
    ) -> Result<Vec<Issue>, ReviewError> {
        let prompt = prompt::build_prompt(source, prior_issues, focus_areas);
        let endpoint = self.config.resolved_endpoint();
        let model = self.config.resolved_model();

        let reply = match self.config.provider {
            LlmProvider::Anthropic => {
                let api_key = self.api_key()?;
                anthropic::complete(&self.http, endpoint, api_key, model, &prompt).await?
            }
            LlmProvider::OpenAi => {
                let api_key = self.api_key()?;
                openai::complete(&self.http, endpoint, api_key, model, &prompt).await?
            }
            LlmProvider::Local => local::complete(&self.http, endpoint, model, &prompt).await?,
        };

        Ok(parse::parse_reply(&reply, source))
    }

    fn api_key(&self) -> Result<&str, ReviewError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(ReviewError::MissingCredential(self.config.provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_rejected_at_construction() {
        let err = LlmReviewer::new(ReviewerConfig::new(LlmProvider::Anthropic)).err();
        assert!(matches!(err, Some(ReviewError::MissingCredential(_))));
    }

    #[test]
    fn test_local_backend_needs_no_key() {
        let reviewer = LlmReviewer::new(ReviewerConfig::new(LlmProvider::Local)).unwrap();
        assert_eq!(reviewer.provider(), LlmProvider::Local);
    }

    #[tokio::test]
    async fn test_unreachable_backend_degrades_to_empty() {
        // Port 9 (discard) refuses connections; review must swallow the
        // transport error and return nothing.
        let config =
            ReviewerConfig::new(LlmProvider::Local).with_endpoint("http://127.0.0.1:9");
        let reviewer = LlmReviewer::new(config).unwrap();
        let issues = reviewer.review("x = 1\n", &[], None).await;
        assert!(issues.is_empty());
    }
}
