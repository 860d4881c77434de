//! Attempt records and classification of remote generation results.

use std::fmt;

use serde::Serialize;

use crate::coach::core::config::InputVariant;
use crate::coach::sanitize::Sanitizer;
use crate::llm::error::LlmError;
use crate::llm::types::{FinishReason, GenerationResult, PromptBlockReason, SamplingConfig};

/// How one remote attempt ended, with the reply text on success.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttemptOutcome {
    /// Usable, non-blank reply text.
    Success(String),
    /// Content-safety filtering stopped generation.
    SafetyBlocked,
    /// Output withheld for overlap with source material.
    RecitationBlocked,
    /// Any other non-success terminal state.
    OtherBlocked,
    /// No candidates, or no text in them.
    Empty,
    /// The call itself failed.
    TransportError {
        /// Error text for logs.
        message: String,
        /// Whether another attempt could succeed.
        retryable: bool,
    },
}

impl AttemptOutcome {
    /// Payload-free classification.
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::SafetyBlocked => OutcomeKind::SafetyBlocked,
            Self::RecitationBlocked => OutcomeKind::RecitationBlocked,
            Self::OtherBlocked => OutcomeKind::OtherBlocked,
            Self::Empty => OutcomeKind::Empty,
            Self::TransportError { .. } => OutcomeKind::TransportError,
        }
    }
}

/// Terminal state of an attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Reply accepted.
    Success,
    /// Safety block.
    SafetyBlocked,
    /// Recitation block.
    RecitationBlocked,
    /// Other block.
    OtherBlocked,
    /// Nothing generated.
    Empty,
    /// Call failed.
    TransportError,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::SafetyBlocked => "safety_blocked",
            Self::RecitationBlocked => "recitation_blocked",
            Self::OtherBlocked => "other_blocked",
            Self::Empty => "empty",
            Self::TransportError => "transport_error",
        };
        f.write_str(label)
    }
}

/// Record of one remote try within a single turn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationAttempt {
    /// One-based attempt number.
    pub number: usize,
    /// Input rendering sent.
    pub variant: InputVariant,
    /// Sampling parameters sent.
    pub sampling: SamplingConfig,
    /// How the attempt ended.
    pub outcome: OutcomeKind,
}

/// Classify a raw generation result.
#[must_use]
pub fn classify(result: Result<GenerationResult, LlmError>) -> AttemptOutcome {
    let result = match result {
        Ok(result) => result,
        Err(err) => {
            return AttemptOutcome::TransportError {
                retryable: err.is_retryable(),
                message: err.to_string(),
            };
        }
    };

    match result.prompt_block {
        Some(PromptBlockReason::Safety) => return AttemptOutcome::SafetyBlocked,
        Some(PromptBlockReason::Other) => return AttemptOutcome::OtherBlocked,
        None => {}
    }

    let Some(candidate) = result.candidates.first() else {
        return AttemptOutcome::Empty;
    };

    match candidate.finish_reason {
        Some(FinishReason::Safety) => AttemptOutcome::SafetyBlocked,
        Some(FinishReason::Recitation) => AttemptOutcome::RecitationBlocked,
        Some(FinishReason::Other) => AttemptOutcome::OtherBlocked,
        Some(FinishReason::Stop | FinishReason::MaxTokens) | None => {
            let text = candidate.text();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                AttemptOutcome::Empty
            } else {
                AttemptOutcome::Success(trimmed.to_string())
            }
        }
    }
}

/// Render the user's text for the given variant.
#[must_use]
pub fn render_variant(variant: InputVariant, user_input: &str, sanitizer: &Sanitizer) -> String {
    match variant {
        InputVariant::Raw => user_input.trim().to_string(),
        InputVariant::Sanitized => sanitizer.sanitize(user_input.trim()),
        InputVariant::ThirdPerson => format!(
            "A client asked their financial advisor this retirement planning question: \"{}\". \
As a professional advisor, give general educational guidance in response.",
            sanitizer.sanitize(user_input.trim())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::core::config::SanitizerConfig;
    use crate::llm::types::Candidate;

    #[test]
    fn test_classify_success_trims() {
        let result = GenerationResult::single(Candidate::stopped("  Save 15%.  \n"));
        assert_eq!(
            classify(Ok(result)),
            AttemptOutcome::Success("Save 15%.".to_string())
        );
    }

    #[test]
    fn test_classify_max_tokens_with_text_is_success() {
        let result = GenerationResult::single(Candidate {
            finish_reason: Some(FinishReason::MaxTokens),
            fragments: vec!["partial but useful".to_string()],
        });
        assert_eq!(classify(Ok(result)).kind(), OutcomeKind::Success);
    }

    #[test]
    fn test_classify_blocks() {
        let safety = GenerationResult::single(Candidate::blocked(FinishReason::Safety));
        let recitation = GenerationResult::single(Candidate::blocked(FinishReason::Recitation));
        let other = GenerationResult::single(Candidate::blocked(FinishReason::Other));

        assert_eq!(classify(Ok(safety)), AttemptOutcome::SafetyBlocked);
        assert_eq!(classify(Ok(recitation)), AttemptOutcome::RecitationBlocked);
        assert_eq!(classify(Ok(other)), AttemptOutcome::OtherBlocked);
    }

    #[test]
    fn test_classify_prompt_block_wins() {
        let mut result = GenerationResult::single(Candidate::stopped("text"));
        result.prompt_block = Some(PromptBlockReason::Safety);
        assert_eq!(classify(Ok(result)), AttemptOutcome::SafetyBlocked);

        let other = GenerationResult::prompt_blocked(PromptBlockReason::Other);
        assert_eq!(classify(Ok(other)), AttemptOutcome::OtherBlocked);
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(
            classify(Ok(GenerationResult::default())),
            AttemptOutcome::Empty
        );
        let blank = GenerationResult::single(Candidate::stopped("   "));
        assert_eq!(classify(Ok(blank)), AttemptOutcome::Empty);
    }

    #[test]
    fn test_classify_transport_error() {
        let err = LlmError::HttpStatus {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(classify(Err(err)).kind(), OutcomeKind::TransportError);
    }

    #[test]
    fn test_classify_missing_key_not_retryable() {
        let outcome = classify(Err(LlmError::ApiKeyRequired("gemini".to_string())));
        assert!(matches!(
            outcome,
            AttemptOutcome::TransportError {
                retryable: false,
                ..
            }
        ));
    }

    #[test]
    fn test_render_variants() {
        let sanitizer = Sanitizer::new(&SanitizerConfig::default()).unwrap();
        let input = " I'm broke and in debt ";

        assert_eq!(
            render_variant(InputVariant::Raw, input, &sanitizer),
            "I'm broke and in debt"
        );
        assert_eq!(
            render_variant(InputVariant::Sanitized, input, &sanitizer),
            "I'm financially constrained and in financial obligations"
        );

        let reframed = render_variant(InputVariant::ThirdPerson, input, &sanitizer);
        assert!(reframed.starts_with("A client asked their financial advisor"));
        assert!(reframed.contains("\"I'm financially constrained and in financial obligations\""));
        assert!(!reframed.contains("debt"));
    }
}
