//! Turn orchestration: attempt loop, classification and reply dispatch.

pub mod attempt;
pub mod orchestrator;

pub use attempt::{AttemptOutcome, GenerationAttempt, OutcomeKind, classify, render_variant};
pub use orchestrator::{CoachOrchestrator, Reply, ReplySource};
