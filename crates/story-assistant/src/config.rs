//! Configuration for StoryAssistant.

use std::env;
use std::time::Duration;
use story_core::{AssistError, LanguageChoice};

/// Default deadline for one model call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration for StoryAssistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Deadline for one gateway call; on expiry the fallback answers.
    pub timeout: Duration,

    /// Language used when a call does not choose one.
    pub default_language: LanguageChoice,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_language: LanguageChoice::Auto,
        }
    }
}

impl AssistantConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `STORY_AI_TIMEOUT_SECS` - Model call deadline in seconds (default: 20)
    /// - `STORY_AI_LANGUAGE` - `auto`, `en` or `vi` (default: auto)
    pub fn from_env() -> Result<Self, AssistError> {
        let timeout = env::var("STORY_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let default_language = match env::var("STORY_AI_LANGUAGE") {
            Ok(value) if !value.trim().is_empty() => {
                value.trim().parse::<LanguageChoice>().map_err(|_| {
                    AssistError::Configuration(format!(
                        "STORY_AI_LANGUAGE must be auto, en or vi, got {:?}",
                        value
                    ))
                })?
            }
            _ => LanguageChoice::Auto,
        };

        Ok(Self {
            timeout,
            default_language,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> AssistantConfigBuilder {
        AssistantConfigBuilder::default()
    }
}

/// Builder for AssistantConfig.
#[derive(Debug, Default)]
pub struct AssistantConfigBuilder {
    config: AssistantConfig,
}

impl AssistantConfigBuilder {
    /// Set the model call deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the default language choice.
    pub fn default_language(mut self, language: impl Into<LanguageChoice>) -> Self {
        self.config.default_language = language.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AssistantConfig {
        self.config
    }
}

/// Serializes tests that touch process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
