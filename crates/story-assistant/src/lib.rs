//! Language-aware authoring assistant for a story-sharing app.
//!
//! This crate provides the [`StoryAssistant`] type, which turns plain story
//! text into structured authoring help: synopses, chapter titles, tone
//! rewrites, plot twists, character-consistency checks, hashtags, genres,
//! summaries, quick recaps and moderation verdicts.
//!
//! # Features
//!
//! - Detects whether the input is English or Vietnamese and answers in kind
//! - Renders one localized prompt per operation with bounded excerpts
//! - Parses loosely formatted model answers into typed payloads
//! - Falls back to deterministic heuristics when the model is offline, slow
//!   or returns something unusable
//! - Scores moderation risk with auditable keyword rules
//!
//! # Architecture
//!
//! ```text
//! UI layer (plain text in, JSON out)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      STORY ASSISTANT                        │
//! │                                                             │
//! │  1. Validate input (only caller errors escape)              │
//! │         ↓                                                   │
//! │  2. Resolve language (pinned, or detected from the input)   │
//! │         ↓                                                   │
//! │  3. Render prompt (catalog)                                 │
//! │         ↓                                                   │
//! │  4. Call gateway under the deadline                         │
//! │         ↓                                                   │
//! │  5. Parse + check contract ──fail──► fallback engine        │
//! │         ↓                                                   │
//! │  6. Assisted { language, payload, source }                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use story_assistant::{InvokeOptions, StoryAssistant};
//!
//! # async fn run() -> Result<(), story_assistant::AssistError> {
//! let assistant = StoryAssistant::offline();
//! let result = assistant
//!     .synopsis(vec!["dragon".into(), "exile".into()], InvokeOptions::auto())
//!     .await?;
//! println!("{} ({:?})", result.payload, result.source);
//! # Ok(())
//! # }
//! ```

mod assistant;
pub mod catalog;
mod config;
pub mod fallback;
mod input;
pub mod moderation;
pub mod parser;
mod payload;

pub use assistant::{StoryAssistant, GENERAL_GENRE};
pub use config::{AssistantConfig, AssistantConfigBuilder, DEFAULT_TIMEOUT_SECS};
pub use fallback::FallbackEngine;
pub use input::{parse_keywords, InvokeOptions, OperationInput, MAX_KEYWORDS};
pub use moderation::{IssueKind, ModerationScorer, ModerationVerdict, RiskTier};
pub use payload::{CharacterIssue, Payload, TagSummary};

// Re-export core types for convenience
pub use story_core::{
    detect_language, AssistError, Assisted, Language, LanguageChoice, ModelGateway,
    OfflineGateway, Operation, Source, Tone,
};
