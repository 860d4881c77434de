//! Vendor-neutral request and response shapes for remote generation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sampling parameters sent with one generation request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Output length cap in tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling mass.
    pub top_p: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
}

impl SamplingConfig {
    /// Build a sampling configuration.
    #[must_use]
    pub const fn new(max_output_tokens: u32, temperature: f32, top_p: f32, top_k: u32) -> Self {
        Self {
            max_output_tokens,
            temperature,
            top_p,
            top_k,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::new(1000, 0.7, 0.9, 40)
    }
}

/// Content-safety categories the remote service filters on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmCategory {
    /// Harassment.
    Harassment,
    /// Hate speech.
    HateSpeech,
    /// Sexually explicit content.
    SexuallyExplicit,
    /// Dangerous content.
    DangerousContent,
}

impl HarmCategory {
    /// Every category, in the order they are sent.
    pub const ALL: [Self; 4] = [
        Self::Harassment,
        Self::HateSpeech,
        Self::SexuallyExplicit,
        Self::DangerousContent,
    ];
}

/// Blocking threshold, ordered from most to least restrictive.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockThreshold {
    /// Block low probability and above.
    BlockMost,
    /// Block medium probability and above.
    BlockSome,
    /// Block only high probability.
    BlockFew,
    /// Never block.
    BlockNone,
}

/// Threshold applied to one harm category.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SafetySetting {
    /// Category the threshold applies to.
    pub category: HarmCategory,
    /// Threshold for that category.
    pub threshold: BlockThreshold,
}

/// One logical generation request.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    /// Full prompt text.
    pub prompt: String,
    /// Sampling parameters.
    pub sampling: SamplingConfig,
    /// Per-category safety thresholds.
    pub safety: Vec<SafetySetting>,
}

/// How a candidate's generation ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop.
    Stop,
    /// Output length cap reached.
    MaxTokens,
    /// Stopped by content-safety filtering.
    Safety,
    /// Withheld for overlap with source material.
    Recitation,
    /// Any other terminal state.
    Other,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Stop => "stop",
            Self::MaxTokens => "max_tokens",
            Self::Safety => "safety",
            Self::Recitation => "recitation",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// A single generated candidate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
    /// Terminal state, when the service reported one.
    pub finish_reason: Option<FinishReason>,
    /// Text fragments; their concatenation is the reply.
    pub fragments: Vec<String>,
}

impl Candidate {
    /// Candidate that stopped normally with the given text.
    #[must_use]
    pub fn stopped(text: impl Into<String>) -> Self {
        Self {
            finish_reason: Some(FinishReason::Stop),
            fragments: vec![text.into()],
        }
    }

    /// Candidate cut off for the given reason with no text.
    #[must_use]
    pub const fn blocked(reason: FinishReason) -> Self {
        Self {
            finish_reason: Some(reason),
            fragments: Vec::new(),
        }
    }

    /// Concatenated text of every fragment.
    #[must_use]
    pub fn text(&self) -> String {
        self.fragments.concat()
    }
}

/// Reason given when the prompt itself was refused.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PromptBlockReason {
    /// Prompt refused by safety filtering.
    Safety,
    /// Prompt refused for any other reason.
    Other,
}

/// Decoded result of one generation call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GenerationResult {
    /// Zero or more candidates.
    pub candidates: Vec<Candidate>,
    /// Prompt-level block indicator, independent of candidates.
    pub prompt_block: Option<PromptBlockReason>,
}

impl GenerationResult {
    /// Result holding a single candidate.
    #[must_use]
    pub fn single(candidate: Candidate) -> Self {
        Self {
            candidates: vec![candidate],
            prompt_block: None,
        }
    }

    /// Result whose prompt was refused before any candidate was produced.
    #[must_use]
    pub const fn prompt_blocked(reason: PromptBlockReason) -> Self {
        Self {
            candidates: Vec::new(),
            prompt_block: Some(reason),
        }
    }
}
