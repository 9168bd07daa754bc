//! Fixed gateway implementation - answers every request with the same text.

use story_core::{async_trait, AssistError, ModelGateway, ModelRequest};

/// A gateway that answers every request with a fixed completion.
///
/// Useful for testing response parsing without a model.
#[derive(Debug, Clone, Default)]
pub struct FixedGateway {
    text: String,
}

impl FixedGateway {
    /// Create a gateway that always answers with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl ModelGateway for FixedGateway {
    async fn generate(&self, _request: &ModelRequest) -> Result<String, AssistError> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "FixedGateway"
    }
}
