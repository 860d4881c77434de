//! Remote text generation: the `TextGenerator` seam and the Gemini client.

pub mod backend;
pub mod error;
pub mod gemini;
#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::must_use_candidate)]
pub mod scripted;
pub mod types;

pub use backend::TextGenerator;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{
    BlockThreshold, Candidate, FinishReason, GenerationRequest, GenerationResult, HarmCategory,
    PromptBlockReason, SafetySetting, SamplingConfig,
};
