//! The assistant facade that ties language, prompts, model and fallbacks
//! together.

use serde_json::{Map, Value};
use std::sync::Arc;

use gemini_gateway::{GeminiGateway, GeminiGatewayConfig};
use story_core::{
    AssistError, Assisted, Language, LanguageChoice, ModelGateway, ModelRequest, OfflineGateway,
    Operation, Source, Tone,
};
use tracing::{debug, info, warn};

use crate::catalog::{self, RenderedPrompt};
use crate::config::AssistantConfig;
use crate::fallback::FallbackEngine;
use crate::input::{self, InvokeOptions, OperationInput};
use crate::moderation::{ModerationScorer, ModerationVerdict};
use crate::parser;
use crate::payload::{CharacterIssue, Payload, TagSummary};

/// Genre reported by [`StoryAssistant::auto_tag`] when none is found.
pub const GENERAL_GENRE: &str = "General";

/// Language-aware authoring assistant.
///
/// Every call runs the same pipeline:
///
/// ```text
/// input ─► validate ─► resolve language ─► render prompt ─► gateway (deadline)
///                                                              │
///                      Assisted { source: model } ◄─ parse ◄───┤ answer
///                      Assisted { source: fallback } ◄─────────┘ no answer / malformed
/// ```
///
/// Only caller errors ([`AssistError::InvalidInput`]) are returned. Model
/// failures, timeouts and malformed answers are logged and served by the
/// deterministic fallback, so an offline assistant still answers every valid
/// request.
pub struct StoryAssistant {
    gateway: Arc<dyn ModelGateway>,
    config: AssistantConfig,
    fallback: FallbackEngine,
    scorer: ModerationScorer,
}

impl StoryAssistant {
    /// Create an assistant over an injected gateway.
    pub fn new(gateway: Arc<dyn ModelGateway>, config: AssistantConfig) -> Self {
        info!(
            "StoryAssistant initialized with gateway: {}, timeout: {:?}, language: {}",
            gateway.name(),
            config.timeout,
            config.default_language
        );

        Self {
            gateway,
            config,
            fallback: FallbackEngine::new(),
            scorer: ModerationScorer::new(),
        }
    }

    /// Create an assistant with the default configuration.
    pub fn with_gateway(gateway: impl ModelGateway + 'static) -> Self {
        Self::new(Arc::new(gateway), AssistantConfig::default())
    }

    /// Create an assistant that always answers from the fallback engine.
    pub fn offline() -> Self {
        Self::with_gateway(OfflineGateway::new())
    }

    /// Create an assistant from environment variables.
    ///
    /// Without a Gemini key the assistant runs offline; see
    /// [`GeminiGatewayConfig::from_env`] and [`AssistantConfig::from_env`].
    pub fn from_env() -> Result<Self, AssistError> {
        let config = AssistantConfig::from_env()?;

        let gateway: Arc<dyn ModelGateway> = match GeminiGatewayConfig::from_env() {
            Ok(gateway_config) => Arc::new(GeminiGateway::new(gateway_config)?),
            Err(e) => {
                info!("No model credential ({}), running offline", e);
                Arc::new(OfflineGateway::new())
            }
        };

        Ok(Self::new(gateway, config))
    }

    /// Name of the gateway in use.
    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Get the configuration.
    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Split a free-form keyword string; see [`input::parse_keywords`].
    pub fn parse_keywords(raw: &str) -> Vec<String> {
        input::parse_keywords(raw)
    }

    /// Run one operation.
    pub async fn invoke(
        &self,
        input: OperationInput,
        options: InvokeOptions,
    ) -> Result<Assisted<Payload>, AssistError> {
        let input = input.validate()?;
        let operation = input.operation();
        let language = options
            .language
            .unwrap_or(self.config.default_language)
            .resolve(&input.language_sample());

        debug!(operation = %operation, language = %language, "Invoking operation");

        if let OperationInput::Moderate { text } = &input {
            return Ok(self.moderate_text(&input, text, language).await);
        }

        // The model only sees the excerpt, so its rewrite cannot stand in
        // for a longer passage.
        if let OperationInput::Rewrite { text, .. } = &input {
            let limit = catalog::excerpt_limit(Operation::Rewrite).unwrap_or(usize::MAX);
            if text.chars().count() > limit {
                return Ok(self.fall_back(&input, language, "input exceeds rewrite excerpt"));
            }
        }

        let prompt = catalog::render(&input, language);
        let Some(raw) = self.call_model(operation, prompt).await else {
            return Ok(self.fall_back(&input, language, "no answer"));
        };

        match parser::parse(operation, &raw) {
            Ok(payload) if payload.satisfies_contract() => {
                debug!(operation = %operation, "MODEL_RESPONSE_ACCEPTED");
                Ok(Assisted::from_model(language, payload))
            }
            Ok(_) => {
                warn!(
                    operation = %operation,
                    error = "payload out of bounds",
                    "MODEL_RESPONSE_MALFORMED"
                );
                Ok(self.fall_back(&input, language, "malformed"))
            }
            Err(e) => {
                warn!(operation = %operation, error = %e, "MODEL_RESPONSE_MALFORMED");
                Ok(self.fall_back(&input, language, "malformed"))
            }
        }
    }

    /// Run an operation named by the UI layer with JSON-shaped fields.
    ///
    /// `fields` holds the operation's input fields, e.g.
    /// `{"text": "...", "tone": "poetic"}`. For synopsis, `keywords` may be a
    /// free-form string. `language` is `auto`, `en` or `vi`; `None` uses the
    /// configured default.
    pub async fn invoke_named(
        &self,
        operation: &str,
        fields: Value,
        language: Option<&str>,
    ) -> Result<Assisted<Payload>, AssistError> {
        let operation: Operation = operation.parse()?;

        let mut fields = match fields {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(AssistError::InvalidInput(format!(
                    "fields for {} must be a JSON object, got {}",
                    operation, other
                )))
            }
        };

        let keywords = fields
            .get("keywords")
            .and_then(Value::as_str)
            .map(input::parse_keywords);
        if let Some(keywords) = keywords {
            fields.insert("keywords".to_string(), Value::from(keywords));
        }
        fields.insert(
            "operation".to_string(),
            Value::String(operation.as_str().to_string()),
        );

        let input: OperationInput = serde_json::from_value(Value::Object(fields))
            .map_err(|e| AssistError::InvalidInput(format!("invalid fields for {}: {}", operation, e)))?;

        let options = match language {
            Some(name) => InvokeOptions::language(name.parse::<LanguageChoice>()?),
            None => InvokeOptions::default(),
        };

        self.invoke(input, options).await
    }

    /// Draft a synopsis from keywords.
    pub async fn synopsis(
        &self,
        keywords: Vec<String>,
        options: InvokeOptions,
    ) -> Result<Assisted<String>, AssistError> {
        let result = self.invoke(OperationInput::Synopsis { keywords }, options).await?;
        Ok(result.map(Payload::into_text))
    }

    /// Suggest up to five chapter titles.
    pub async fn chapter_titles(
        &self,
        text: &str,
        options: InvokeOptions,
    ) -> Result<Assisted<Vec<String>>, AssistError> {
        let input = OperationInput::ChapterTitles { text: text.to_string() };
        Ok(self.invoke(input, options).await?.map(Payload::into_list))
    }

    /// Rewrite a passage in the given tone.
    ///
    /// Passages longer than the rewrite excerpt bound are returned unchanged
    /// from the fallback without a model call.
    pub async fn rewrite(
        &self,
        text: &str,
        tone: Tone,
        options: InvokeOptions,
    ) -> Result<Assisted<String>, AssistError> {
        let input = OperationInput::Rewrite {
            text: text.to_string(),
            tone,
        };
        Ok(self.invoke(input, options).await?.map(Payload::into_text))
    }

    /// Suggest up to three plot twists.
    pub async fn plot_twists(
        &self,
        text: &str,
        options: InvokeOptions,
    ) -> Result<Assisted<Vec<String>>, AssistError> {
        let input = OperationInput::PlotTwists { text: text.to_string() };
        Ok(self.invoke(input, options).await?.map(Payload::into_list))
    }

    /// Check a passage against a character profile.
    pub async fn character_check(
        &self,
        text: &str,
        profile: &str,
        options: InvokeOptions,
    ) -> Result<Assisted<Vec<CharacterIssue>>, AssistError> {
        let input = OperationInput::CharacterCheck {
            text: text.to_string(),
            profile: profile.to_string(),
        };
        Ok(self
            .invoke(input, options)
            .await?
            .map(Payload::into_character_issues))
    }

    /// Suggest up to fifteen hashtags.
    pub async fn hashtags(
        &self,
        text: &str,
        options: InvokeOptions,
    ) -> Result<Assisted<Vec<String>>, AssistError> {
        let input = OperationInput::Hashtags { text: text.to_string() };
        Ok(self.invoke(input, options).await?.map(Payload::into_list))
    }

    /// Classify a story into up to three genres.
    pub async fn genres(
        &self,
        text: &str,
        options: InvokeOptions,
    ) -> Result<Assisted<Vec<String>>, AssistError> {
        let input = OperationInput::Genres { text: text.to_string() };
        Ok(self.invoke(input, options).await?.map(Payload::into_list))
    }

    /// Score a text for moderation risk.
    pub async fn moderate(
        &self,
        text: &str,
        options: InvokeOptions,
    ) -> Result<Assisted<ModerationVerdict>, AssistError> {
        let input = OperationInput::Moderate { text: text.to_string() };
        let result = self.invoke(input, options).await?;
        let language = result.language;
        let scorer = self.scorer;
        Ok(result.map(|payload| {
            payload
                .into_verdict()
                .unwrap_or_else(|| scorer.moderate(text, language))
        }))
    }

    /// Summarize a story.
    pub async fn summary(
        &self,
        text: &str,
        options: InvokeOptions,
    ) -> Result<Assisted<String>, AssistError> {
        let input = OperationInput::Summary { text: text.to_string() };
        Ok(self.invoke(input, options).await?.map(Payload::into_text))
    }

    /// Recap the key events of a passage as short bullets.
    pub async fn fast_recap(
        &self,
        text: &str,
        options: InvokeOptions,
    ) -> Result<Assisted<Vec<String>>, AssistError> {
        let input = OperationInput::FastRecap { text: text.to_string() };
        Ok(self.invoke(input, options).await?.map(Payload::into_list))
    }

    /// Suggest a primary genre and hashtags in one go.
    ///
    /// The result is model-backed only if both underlying calls were.
    pub async fn auto_tag(
        &self,
        text: &str,
        options: InvokeOptions,
    ) -> Result<Assisted<TagSummary>, AssistError> {
        let tags = self.hashtags(text, options).await?;
        let genres = self.genres(text, options).await?;

        let source = if tags.is_model() && genres.is_model() {
            Source::Model
        } else {
            Source::Fallback
        };
        let genre = genres
            .payload
            .into_iter()
            .next()
            .unwrap_or_else(|| GENERAL_GENRE.to_string());

        Ok(Assisted {
            language: tags.language,
            payload: TagSummary {
                genre,
                tags: tags.payload,
            },
            source,
        })
    }

    /// Rule verdict, with the model asked for a safe rewrite when something
    /// was flagged.
    async fn moderate_text(
        &self,
        input: &OperationInput,
        text: &str,
        language: Language,
    ) -> Assisted<Payload> {
        let mut verdict = self.scorer.moderate(text, language);
        debug!(
            issues = verdict.issues.len(),
            risk = ?verdict.risk,
            "Moderation scored"
        );

        if verdict.is_clean() {
            return Assisted::from_fallback(language, Payload::Moderate(verdict));
        }

        let prompt = catalog::render(input, language);
        let fix = match self.call_model(Operation::Moderate, prompt).await {
            Some(raw) => parser::parse_fix(&raw)
                .map_err(|e| {
                    warn!(operation = %Operation::Moderate, error = %e, "MODEL_RESPONSE_MALFORMED");
                })
                .ok(),
            None => None,
        };

        match fix {
            Some(fix) => {
                verdict.recommended_fix = fix;
                Assisted::from_model(language, Payload::Moderate(verdict))
            }
            None => {
                info!(
                    operation = %Operation::Moderate,
                    language = %language,
                    "FALLBACK_USED"
                );
                Assisted::from_fallback(language, Payload::Moderate(verdict))
            }
        }
    }

    /// Call the gateway under the configured deadline.
    async fn call_model(&self, operation: Operation, prompt: RenderedPrompt) -> Option<String> {
        let request = if prompt.structured {
            ModelRequest::structured(operation, prompt.text)
        } else {
            ModelRequest::text(operation, prompt.text)
        };

        info!(
            operation = %operation,
            gateway = self.gateway.name(),
            fingerprint = %request.fingerprint(),
            structured = request.structured,
            "MODEL_REQUEST"
        );

        match tokio::time::timeout(self.config.timeout, self.gateway.call(&request)).await {
            Ok(response) => response.raw_text,
            Err(_) => {
                warn!(
                    operation = %operation,
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "MODEL_TIMEOUT"
                );
                None
            }
        }
    }

    fn fall_back(&self, input: &OperationInput, language: Language, reason: &str) -> Assisted<Payload> {
        info!(
            operation = %input.operation(),
            language = %language,
            reason,
            "FALLBACK_USED"
        );
        Assisted::from_fallback(language, self.fallback.fallback(input, language))
    }
}
