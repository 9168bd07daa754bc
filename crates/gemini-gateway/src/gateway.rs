//! GeminiGateway implementation using the Gemini API.

use reqwest::Client;
use story_core::{async_trait, AssistError, ModelGateway, ModelRequest};
use tracing::{debug, info};

use crate::api_types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::config::GeminiGatewayConfig;

/// A gateway that sends prompts to Google's Gemini API.
///
/// Each call is a single stateless `generateContent` request. The gateway
/// never retries; the HTTP client enforces the configured deadline.
pub struct GeminiGateway {
    client: Client,
    config: GeminiGatewayConfig,
}

impl GeminiGateway {
    /// Create a new GeminiGateway with the given configuration.
    pub fn new(config: GeminiGatewayConfig) -> Result<Self, AssistError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "GeminiGateway initialized with model: {}, timeout: {:?}, key configured: {}",
            config.model,
            config.timeout,
            config.has_key()
        );

        Ok(Self { client, config })
    }

    /// Create a GeminiGateway from environment variables.
    ///
    /// See [`GeminiGatewayConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, AssistError> {
        let config = GeminiGatewayConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiGatewayConfig {
        &self.config
    }

    /// Build the request body for a model request.
    fn build_request(&self, request: &ModelRequest) -> GenerateContentRequest {
        let generation_config = GenerationConfig {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
            response_mime_type: request
                .structured
                .then(|| "application/json".to_string()),
        };

        GenerateContentRequest {
            contents: vec![Content::user(request.prompt.clone())],
            generation_config: Some(generation_config),
        }
    }

    /// Endpoint URL for the configured model.
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Make a generateContent request to the Gemini API.
    async fn generate_content(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AssistError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssistError::Timeout
                } else {
                    AssistError::Unavailable(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as API error
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(AssistError::Unavailable(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(AssistError::Unavailable(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AssistError::Unavailable(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate(&self, request: &ModelRequest) -> Result<String, AssistError> {
        if !self.config.has_key() {
            return Err(AssistError::Unavailable("no API key configured".to_string()));
        }

        debug!(
            operation = %request.operation,
            structured = request.structured,
            prompt_hash = %request.fingerprint(),
            "Sending request to Gemini API"
        );

        let body = self.build_request(request);
        let completion = self.generate_content(&body).await?;

        if let Some(ref usage) = completion.usage_metadata {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        let finish_reason = completion
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref());

        match completion.text() {
            Some(text) => match finish_reason {
                // Partial text from a truncated or filtered candidate is not an answer.
                Some(reason) if reason != "STOP" => Err(AssistError::Malformed(format!(
                    "completion cut short: {}",
                    reason
                ))),
                _ => Ok(text),
            },
            None => {
                let reason = completion
                    .prompt_feedback
                    .as_ref()
                    .and_then(|f| f.block_reason.clone())
                    .or_else(|| {
                        completion
                            .candidates
                            .first()
                            .and_then(|c| c.finish_reason.clone())
                    })
                    .unwrap_or_else(|| "no candidates".to_string());
                Err(AssistError::Unavailable(format!("empty completion: {}", reason)))
            }
        }
    }

    fn name(&self) -> &str {
        "GeminiGateway"
    }

    fn is_available(&self) -> bool {
        self.config.has_key()
    }
}
