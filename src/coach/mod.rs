//! Retirement coaching: prompt building, input rewriting, fallback guidance and the turn loop.
//!
//! - `core`: messages, profile, configuration, errors
//! - `prompt`: persona and prompt assembly
//! - `sanitize`: whole-word term substitution
//! - `fallback`: deterministic topic templates
//! - `engine`: retry/fallback orchestration

pub mod core;
pub mod engine;
pub mod fallback;
pub mod prompt;
pub mod sanitize;

pub use self::core::{CoachConfig, CoachError, CoachResult, ConversationHistory, Message, Role, UserProfile};
pub use engine::{CoachOrchestrator, Reply, ReplySource};
pub use sanitize::Sanitizer;
