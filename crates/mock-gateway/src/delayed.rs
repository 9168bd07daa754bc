//! Latency injection for deadline tests.

use std::time::Duration;

use story_core::{async_trait, AssistError, ModelGateway, ModelRequest};
use tokio::time::sleep;

/// Answers like the wrapped gateway, but only after `latency` has passed.
///
/// Lets tests push a model call past the assistant's deadline. An offline
/// inner gateway stays offline: `call` short-circuits on `is_available`
/// before any latency is spent.
pub struct DelayedGateway<G: ModelGateway> {
    inner: G,
    latency: Duration,
    name: String,
}

impl<G: ModelGateway> DelayedGateway<G> {
    pub fn new(inner: G, latency: Duration) -> Self {
        let name = format!("Delayed({})", inner.name());
        Self {
            inner,
            latency,
            name,
        }
    }

    pub fn with_millis(inner: G, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Latency added before every answer.
    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl<G: ModelGateway> ModelGateway for DelayedGateway<G> {
    async fn generate(&self, request: &ModelRequest) -> Result<String, AssistError> {
        sleep(self.latency).await;
        self.inner.generate(request).await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.inner.is_available()
    }
}
