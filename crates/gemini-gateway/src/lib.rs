//! Google Gemini completion gateway.
//!
//! This crate provides a [`ModelGateway`] implementation that sends each
//! rendered prompt to the Gemini `generateContent` endpoint and returns the
//! completion text.
//!
//! # Features
//!
//! - Single-turn, stateless requests (one prompt in, one text blob out)
//! - Structured-output mode (`responseMimeType: application/json`)
//! - Explicit request deadline on the HTTP client
//! - Configurable via environment variables
//! - No key configured means no network traffic: the gateway reports itself
//!   unavailable and the assistant serves its fallback path
//!
//! # Usage
//!
//! ```rust,no_run
//! use gemini_gateway::GeminiGateway;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = GeminiGateway::from_env()?;
//!     // Inject the gateway into the assistant...
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod gateway;

pub use config::{GeminiGatewayConfig, GeminiGatewayConfigBuilder};
pub use gateway::GeminiGateway;

// Re-export story-core types for convenience
pub use story_core::{async_trait, AssistError, ModelGateway, ModelRequest, ModelResponse, Operation};
