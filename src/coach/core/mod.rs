//! Core coaching types: messages, profile, configuration and errors.

pub mod config;
pub mod errors;
pub mod message;
pub mod profile;

pub use config::{
    AttemptPlan, CoachConfig, GeminiConfig, InputVariant, PromptConfig, PromptStyle, RetryConfig,
    SafetyConfig, SanitizerConfig, TermSubstitution,
};
pub use errors::{CoachError, CoachResult};
pub use message::{ConversationHistory, Message, Role};
pub use profile::{IncomeBracket, NOT_SPECIFIED, RiskTolerance, UserProfile};
