//! Reviewer backend configuration.
//!
//! Backend choice and credentials are external configuration, fixed at
//! construction time. A missing credential is not an error at this layer;
//! the pipeline degrades to tree-analysis-only when no reviewer can be
//! built.

use std::env;

/// Supported generative-text backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Anthropic,
    OpenAi,
    Local,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::OpenAi => "openai",
            LlmProvider::Local => "local",
        }
    }

    /// The local backend talks to an unauthenticated HTTP endpoint.
    pub fn requires_credential(&self) -> bool {
        !matches!(self, LlmProvider::Local)
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "claude-sonnet-4-20250514",
            LlmProvider::OpenAi => "gpt-4",
            LlmProvider::Local => "codellama",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "https://api.anthropic.com/v1",
            LlmProvider::OpenAi => "https://api.openai.com/v1",
            LlmProvider::Local => "http://localhost:11434",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(LlmProvider::Anthropic),
            "openai" => Ok(LlmProvider::OpenAi),
            "local" => Ok(LlmProvider::Local),
            _ => Err(format!("unknown provider: {}", s)),
        }
    }
}

/// Configuration for the external reviewer adapter.
#[derive(Debug, Clone)]
pub struct ReviewerConfig {
    pub provider: LlmProvider,
    pub api_key: Option<String>,
    /// Model override; each provider has a default.
    pub model: Option<String>,
    /// Endpoint override; each provider has a default.
    pub endpoint: Option<String>,
}

impl ReviewerConfig {
    pub fn new(provider: LlmProvider) -> Self {
        Self {
            provider,
            api_key: None,
            model: None,
            endpoint: None,
        }
    }

    /// Build a config from `LLM_PROVIDER` / `LLM_API_KEY`.
    ///
    /// Returns None when no credential is configured: the caller runs in
    /// tree-analysis-only mode. An unrecognized provider name falls back
    /// to the local backend.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty())?;

        let provider = match env::var("LLM_PROVIDER").ok().as_deref() {
            None | Some("anthropic") => LlmProvider::Anthropic,
            Some("openai") => LlmProvider::OpenAi,
            Some(_) => LlmProvider::Local,
        };

        Some(Self {
            provider,
            api_key: Some(api_key),
            model: None,
            endpoint: None,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Model to use, falling back to the provider default.
    pub fn resolved_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Endpoint to use, falling back to the provider default.
    pub fn resolved_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("anthropic".parse::<LlmProvider>(), Ok(LlmProvider::Anthropic));
        assert_eq!("OpenAI".parse::<LlmProvider>(), Ok(LlmProvider::OpenAi));
        assert_eq!("local".parse::<LlmProvider>(), Ok(LlmProvider::Local));
        assert!("bedrock".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_defaults_resolved() {
        let config = ReviewerConfig::new(LlmProvider::OpenAi);
        assert_eq!(config.resolved_model(), "gpt-4");
        assert_eq!(config.resolved_endpoint(), "https://api.openai.com/v1");

        let config = config.with_model("gpt-4o").with_endpoint("http://proxy:8080/v1");
        assert_eq!(config.resolved_model(), "gpt-4o");
        assert_eq!(config.resolved_endpoint(), "http://proxy:8080/v1");
    }

    #[test]
    fn test_local_needs_no_credential() {
        assert!(!LlmProvider::Local.requires_credential());
        assert!(LlmProvider::Anthropic.requires_credential());
        assert!(LlmProvider::OpenAi.requires_credential());
    }
}
