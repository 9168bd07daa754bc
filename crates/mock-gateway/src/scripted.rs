//! Scripted gateway implementation - per-operation answers with call recording.

use std::collections::HashMap;

use story_core::{async_trait, AssistError, ModelGateway, ModelRequest, Operation};
use tokio::sync::Mutex;

/// A gateway that answers according to a per-operation script.
///
/// Every request is recorded so tests can assert on the rendered prompts.
/// Operations without a script fail with `AssistError::Unavailable`.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    script: HashMap<Operation, Result<String, AssistError>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedGateway {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `operation` with `text`.
    pub fn respond(mut self, operation: Operation, text: impl Into<String>) -> Self {
        self.script.insert(operation, Ok(text.into()));
        self
    }

    /// Fail `operation` with `error`.
    pub fn fail(mut self, operation: Operation, error: AssistError) -> Self {
        self.script.insert(operation, Err(error));
        self
    }

    /// All requests received so far, in order.
    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn generate(&self, request: &ModelRequest) -> Result<String, AssistError> {
        self.requests.lock().await.push(request.clone());

        self.script
            .get(&request.operation)
            .cloned()
            .unwrap_or_else(|| {
                Err(AssistError::Unavailable(format!(
                    "no scripted answer for {}",
                    request.operation
                )))
            })
    }

    fn name(&self) -> &str {
        "ScriptedGateway"
    }
}
