//! Configuration for GeminiGateway.

use std::env;
use std::time::Duration;
use story_core::AssistError;

/// Default Gemini API base URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default request deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for GeminiGateway.
#[derive(Debug, Clone)]
pub struct GeminiGatewayConfig {
    /// Gemini API base URL.
    pub api_url: String,

    /// API key for authentication. Empty means offline.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum tokens for the completion.
    pub max_output_tokens: Option<u32>,

    /// Deadline applied to every HTTP request.
    pub timeout: Duration,
}

impl Default for GeminiGatewayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(0.7),
            max_output_tokens: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GeminiGatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables (first one set wins):
    /// - `GEMINI_API_KEY` - API key for authentication
    /// - `API_KEY` - Legacy name for the same key
    ///
    /// Optional environment variables:
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_MODEL` - Model name (default: gemini-2.5-flash)
    /// - `GEMINI_TEMPERATURE` - Temperature (default: 0.7)
    /// - `GEMINI_MAX_OUTPUT_TOKENS` - Max output tokens (default: unset, the model's own limit)
    /// - `GEMINI_TIMEOUT_SECS` - Request deadline in seconds (default: 30)
    pub fn from_env() -> Result<Self, AssistError> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env::var("API_KEY").ok().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                AssistError::Configuration("GEMINI_API_KEY (or API_KEY) not set".to_string())
            })?;

        let api_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let temperature = env::var("GEMINI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(0.7));

        let max_output_tokens = env::var("GEMINI_MAX_OUTPUT_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok());

        let timeout = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Ok(Self {
            api_url,
            api_key,
            model,
            temperature,
            max_output_tokens,
            timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiGatewayConfigBuilder {
        GeminiGatewayConfigBuilder::default()
    }

    /// Check whether a credential is configured.
    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Builder for GeminiGatewayConfig.
#[derive(Debug, Default)]
pub struct GeminiGatewayConfigBuilder {
    config: GeminiGatewayConfig,
}

impl GeminiGatewayConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the max output tokens.
    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.max_output_tokens = Some(tokens);
        self
    }

    /// Set the request deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiGatewayConfig {
        self.config
    }
}
