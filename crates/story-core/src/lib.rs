//! Core types for the story assistant.
//!
//! This crate provides the shared vocabulary used by every other crate in
//! the workspace:
//!
//! - [`Language`] / [`detect_language`] - The supported languages and the
//!   lexical detector that picks one for a text sample
//! - [`Operation`] / [`Tone`] - The authoring tasks the assistant performs
//! - [`ModelGateway`] - The trait every completion backend implements
//! - [`Assisted`] / [`Source`] - A result tagged with its language and origin
//! - [`AssistError`] - Error taxonomy for the whole layer
//!
//! # Example
//!
//! ```rust
//! use story_core::{async_trait, AssistError, ModelGateway, ModelRequest};
//!
//! struct CannedGateway;
//!
//! #[async_trait]
//! impl ModelGateway for CannedGateway {
//!     async fn generate(&self, _request: &ModelRequest) -> Result<String, AssistError> {
//!         Ok("A story about dragons.".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "CannedGateway"
//!     }
//! }
//! ```

mod assisted;
mod error;
mod gateway;
mod language;
mod operation;
mod prompt;

pub use assisted::{Assisted, Source};
pub use error::AssistError;
pub use gateway::{ModelGateway, ModelRequest, ModelResponse, OfflineGateway};
pub use language::{
    detect_language, normalize_text, Language, LanguageChoice, DETECTION_SAMPLE_CHARS,
};
pub use operation::{Operation, Tone};
pub use prompt::{excerpt, hash_prompt};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
