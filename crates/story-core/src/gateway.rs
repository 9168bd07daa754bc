//! The model gateway trait and its request/response types.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::AssistError;
use crate::operation::Operation;
use crate::prompt::hash_prompt;

/// A single request to the completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    /// The operation this request serves (used for logging and fakes).
    pub operation: Operation,
    /// The fully rendered prompt.
    pub prompt: String,
    /// Ask the service for a machine-parseable (JSON) answer.
    pub structured: bool,
}

impl ModelRequest {
    /// Create a free-text request.
    pub fn text(operation: Operation, prompt: impl Into<String>) -> Self {
        Self {
            operation,
            prompt: prompt.into(),
            structured: false,
        }
    }

    /// Create a request that asks for structured (JSON) output.
    pub fn structured(operation: Operation, prompt: impl Into<String>) -> Self {
        Self {
            operation,
            prompt: prompt.into(),
            structured: true,
        }
    }

    /// Stable fingerprint of the prompt, safe to log.
    pub fn fingerprint(&self) -> String {
        hash_prompt(&self.prompt)
    }
}

/// The answer from a gateway call.
///
/// `raw_text` is `None` when there is no answer at all; it is never an empty
/// string standing in for "no answer".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub raw_text: Option<String>,
}

impl ModelResponse {
    /// A response carrying text.
    pub fn answered(text: impl Into<String>) -> Self {
        Self {
            raw_text: Some(text.into()),
        }
    }

    /// The "no answer" response.
    pub fn none() -> Self {
        Self { raw_text: None }
    }

    /// Check if the service produced no answer.
    pub fn is_none(&self) -> bool {
        self.raw_text.is_none()
    }
}

/// A completion backend.
///
/// Implementations report failures through [`ModelGateway::generate`]; the
/// provided [`ModelGateway::call`] converts every failure into an empty
/// [`ModelResponse`] so callers never see an error from this seam.
/// Gateways never retry on their own.
///
/// This trait is object-safe and can be used as `Arc<dyn ModelGateway>`.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send the request and return the raw completion text.
    async fn generate(&self, request: &ModelRequest) -> Result<String, AssistError>;

    /// Get a human-readable name for this gateway.
    fn name(&self) -> &str;

    /// Check whether the gateway can reach a model at all.
    ///
    /// Default implementation always returns true.
    fn is_available(&self) -> bool {
        true
    }

    /// Call the model, absorbing every failure.
    async fn call(&self, request: &ModelRequest) -> ModelResponse {
        if !self.is_available() {
            debug!(
                gateway = self.name(),
                operation = %request.operation,
                "MODEL_OFFLINE"
            );
            return ModelResponse::none();
        }

        match self.generate(request).await {
            Ok(text) if text.trim().is_empty() => {
                warn!(
                    gateway = self.name(),
                    operation = %request.operation,
                    "MODEL_EMPTY_RESPONSE"
                );
                ModelResponse::none()
            }
            Ok(text) => ModelResponse::answered(text),
            Err(e) => {
                warn!(
                    gateway = self.name(),
                    operation = %request.operation,
                    kind = e.kind(),
                    error = %e,
                    "MODEL_UNAVAILABLE"
                );
                ModelResponse::none()
            }
        }
    }
}

/// A gateway with no model behind it.
///
/// Used when no credential is configured; every call yields no answer and
/// the assistant serves the fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGateway;

impl OfflineGateway {
    /// Create a new offline gateway.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModelGateway for OfflineGateway {
    async fn generate(&self, _request: &ModelRequest) -> Result<String, AssistError> {
        Err(AssistError::Unavailable("no model credential configured".to_string()))
    }

    fn name(&self) -> &str {
        "OfflineGateway"
    }

    fn is_available(&self) -> bool {
        false
    }
}
