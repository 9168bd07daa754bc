//! Fake model gateways for exercising the story assistant without a network.
//!
//! This crate provides implementations of the `ModelGateway` trait for testing:
//! - `FixedGateway` - Answers every request with the same text
//! - `ScriptedGateway` - Answers per operation and records every request
//! - `DelayedGateway` - Wraps another gateway with artificial latency
//! - `FailingGateway` - Fails every request with a chosen error
//!
//! For production use, see the `gemini-gateway` crate.
//!
//! # Example
//!
//! ```rust
//! use mock_gateway::{FixedGateway, ModelGateway, ModelRequest, Operation};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = FixedGateway::new("Title one\nTitle two");
//!
//!     let request = ModelRequest::text(Operation::ChapterTitles, "Suggest titles");
//!     let response = gateway.call(&request).await;
//!     assert_eq!(response.raw_text.as_deref(), Some("Title one\nTitle two"));
//! }
//! ```

mod delayed;
mod failing;
mod fixed;
mod scripted;

// Re-export story-core types for convenience
pub use story_core::{async_trait, AssistError, ModelGateway, ModelRequest, ModelResponse, Operation};

pub use delayed::DelayedGateway;
pub use failing::FailingGateway;
pub use fixed::FixedGateway;
pub use scripted::ScriptedGateway;
