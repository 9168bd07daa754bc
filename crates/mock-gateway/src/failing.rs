//! Failing gateway implementation - every request fails.

use story_core::{async_trait, AssistError, ModelGateway, ModelRequest};

/// A gateway that fails every request with the same error.
///
/// Unlike `OfflineGateway`, this one reports itself available, so the
/// failure goes through the error-absorbing path of `ModelGateway::call`.
#[derive(Debug, Clone)]
pub struct FailingGateway {
    error: AssistError,
}

impl FailingGateway {
    /// Create a gateway that fails with `error`.
    pub fn new(error: AssistError) -> Self {
        Self { error }
    }

    /// A gateway whose transport is down.
    pub fn network_down() -> Self {
        Self::new(AssistError::Unavailable("connection refused".to_string()))
    }

    /// A gateway whose requests always time out.
    pub fn timing_out() -> Self {
        Self::new(AssistError::Timeout)
    }
}

#[async_trait]
impl ModelGateway for FailingGateway {
    async fn generate(&self, _request: &ModelRequest) -> Result<String, AssistError> {
        Err(self.error.clone())
    }

    fn name(&self) -> &str {
        "FailingGateway"
    }
}
