//! Configuration for the coaching orchestrator.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::coach::core::errors::{CoachError, CoachResult};
use crate::llm::types::{BlockThreshold, HarmCategory, SafetySetting, SamplingConfig};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "RETIRECHAT_MODEL";
/// Environment variable overriding the Gemini base URL.
pub const BASE_URL_ENV: &str = "RETIRECHAT_GEMINI_URL";
/// Environment variable selecting `compact` or `verbose` prompts.
pub const PROMPT_STYLE_ENV: &str = "RETIRECHAT_PROMPT_STYLE";
/// Environment variable overriding the attempt count.
pub const MAX_ATTEMPTS_ENV: &str = "RETIRECHAT_MAX_ATTEMPTS";
/// Environment variable overriding the inter-attempt delay.
pub const RETRY_DELAY_ENV: &str = "RETIRECHAT_RETRY_DELAY_MS";
/// Environment variable pointing at a JSON config file.
pub const CONFIG_PATH_ENV: &str = "RETIRECHAT_CONFIG";

/// Smallest per-message or per-field character cap; room for one character plus "...".
pub const MIN_CHAR_LIMIT: usize = 4;

/// Top-level configuration for the coach.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    /// Remote model settings.
    pub gemini: GeminiConfig,
    /// Prompt construction settings.
    pub prompt: PromptConfig,
    /// Attempt and retry policy.
    pub retry: RetryConfig,
    /// Content-safety thresholds sent with every request.
    pub safety: SafetyConfig,
    /// Term substitutions applied to sanitized input variants.
    pub sanitizer: SanitizerConfig,
}

impl CoachConfig {
    /// Load a JSON config file; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> CoachResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Defaults (or `RETIRECHAT_CONFIG` file) overlaid with environment variables.
    ///
    /// # Errors
    /// Returns an error if the config file or an override is invalid.
    pub fn from_env() -> CoachResult<Self> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_json_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Apply environment overrides on top of this config.
    ///
    /// # Errors
    /// Returns an error if an override cannot be parsed.
    pub fn with_env_overrides(mut self) -> CoachResult<Self> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.gemini.api_key = Some(key);
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            self.gemini.model = model;
        }
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            self.gemini.base_url = url;
        }
        if let Ok(style) = std::env::var(PROMPT_STYLE_ENV) {
            self.prompt = match style.trim().to_ascii_lowercase().as_str() {
                "verbose" => PromptConfig::verbose(),
                "compact" => PromptConfig::compact(),
                other => {
                    return Err(CoachError::InvalidConfig(format!(
                        "{PROMPT_STYLE_ENV} must be compact or verbose, got {other}"
                    )));
                }
            };
        }
        if let Ok(attempts) = std::env::var(MAX_ATTEMPTS_ENV) {
            self.retry.max_attempts = attempts.trim().parse().map_err(|_| {
                CoachError::InvalidConfig(format!("{MAX_ATTEMPTS_ENV} must be an integer"))
            })?;
        }
        if let Ok(delay) = std::env::var(RETRY_DELAY_ENV) {
            self.retry.delay_ms = delay.trim().parse().map_err(|_| {
                CoachError::InvalidConfig(format!("{RETRY_DELAY_ENV} must be an integer"))
            })?;
        }
        Ok(self)
    }

    /// Use the given prompt settings.
    #[must_use]
    pub fn with_prompt(mut self, prompt: PromptConfig) -> Self {
        self.prompt = prompt;
        self
    }

    /// Use the given retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> CoachResult<()> {
        Url::parse(&self.gemini.base_url)?;

        if self.gemini.model.trim().is_empty() {
            return Err(CoachError::InvalidConfig(
                "gemini.model must not be empty".to_string(),
            ));
        }

        if self.prompt.history_window == 0 {
            return Err(CoachError::InvalidConfig(
                "prompt.history_window must be > 0".to_string(),
            ));
        }

        if self.prompt.max_message_chars < MIN_CHAR_LIMIT
            || self.prompt.max_profile_value_chars < MIN_CHAR_LIMIT
        {
            return Err(CoachError::InvalidConfig(format!(
                "prompt character limits must be >= {MIN_CHAR_LIMIT}"
            )));
        }

        if self.retry.max_attempts == 0 {
            return Err(CoachError::InvalidConfig(
                "retry.max_attempts must be > 0".to_string(),
            ));
        }

        if self.retry.plans.is_empty() {
            return Err(CoachError::InvalidConfig(
                "retry.plans must not be empty".to_string(),
            ));
        }

        for (idx, plan) in self.retry.plans.iter().enumerate() {
            let sampling = &plan.sampling;
            if sampling.max_output_tokens == 0 {
                return Err(CoachError::InvalidConfig(format!(
                    "retry.plans[{idx}].max_output_tokens must be > 0"
                )));
            }
            if !(0.0..=2.0).contains(&sampling.temperature) {
                return Err(CoachError::InvalidConfig(format!(
                    "retry.plans[{idx}].temperature must be within 0..=2"
                )));
            }
            if !(sampling.top_p > 0.0 && sampling.top_p <= 1.0) {
                return Err(CoachError::InvalidConfig(format!(
                    "retry.plans[{idx}].top_p must be within (0, 1]"
                )));
            }
        }

        for sub in &self.sanitizer.terms {
            if sub.term.trim().is_empty() {
                return Err(CoachError::InvalidConfig(
                    "sanitizer terms must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Remote model settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Model name.
    pub model: String,
    /// API base URL.
    pub base_url: String,
    /// API key; read from `GOOGLE_API_KEY`, never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/".to_string(),
            api_key: None,
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
        }
    }
}

/// How much context the prompt carries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// Full persona and long history.
    Verbose,
    /// Short persona, profile summary and a short, trimmed history.
    Compact,
}

/// Prompt construction settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Persona and layout.
    pub style: PromptStyle,
    /// Number of recent messages included.
    pub history_window: usize,
    /// Per-message character cap.
    pub max_message_chars: usize,
    /// Maximum profile fields included.
    pub max_profile_fields: usize,
    /// Per-field character cap for profile values.
    pub max_profile_value_chars: usize,
}

impl PromptConfig {
    /// Full persona with the last ten messages.
    #[must_use]
    pub const fn verbose() -> Self {
        Self {
            style: PromptStyle::Verbose,
            history_window: 10,
            max_message_chars: 500,
            max_profile_fields: 6,
            max_profile_value_chars: 60,
        }
    }

    /// Short persona with the last four messages.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            style: PromptStyle::Compact,
            history_window: 4,
            max_message_chars: 150,
            max_profile_fields: 6,
            max_profile_value_chars: 60,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self::compact()
    }
}

/// Which rendering of the user's text an attempt sends.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputVariant {
    /// Input exactly as typed.
    Raw,
    /// Input after term substitution.
    Sanitized,
    /// Sanitized input reframed as a client question to an advisor.
    ThirdPerson,
}

impl InputVariant {
    /// Stable string form for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Sanitized => "sanitized",
            Self::ThirdPerson => "third_person",
        }
    }
}

/// Input variant and sampling used by one attempt.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttemptPlan {
    /// Input rendering.
    pub variant: InputVariant,
    /// Sampling parameters.
    pub sampling: SamplingConfig,
}

/// Attempt and retry policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per chat turn.
    pub max_attempts: usize,
    /// Pause between attempts in milliseconds.
    pub delay_ms: u64,
    /// Plans by attempt; the last one repeats when attempts outnumber plans.
    pub plans: Vec<AttemptPlan>,
    /// Try again when the service returns no text.
    pub retry_on_empty: bool,
    /// Try the next variant after a safety block instead of falling back at once.
    pub retry_on_safety_block: bool,
}

impl RetryConfig {
    /// Plan for a zero-based attempt index.
    #[must_use]
    pub fn plan_for(&self, attempt_idx: usize) -> AttemptPlan {
        self.plans
            .get(attempt_idx)
            .or_else(|| self.plans.last())
            .copied()
            .unwrap_or(AttemptPlan {
                variant: InputVariant::Raw,
                sampling: SamplingConfig::default(),
            })
    }

    /// Same policy with no pause between attempts.
    #[must_use]
    pub const fn without_delay(mut self) -> Self {
        self.delay_ms = 0;
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 500,
            plans: vec![
                AttemptPlan {
                    variant: InputVariant::Raw,
                    sampling: SamplingConfig::new(1000, 0.7, 0.9, 40),
                },
                AttemptPlan {
                    variant: InputVariant::Sanitized,
                    sampling: SamplingConfig::new(800, 0.5, 0.8, 30),
                },
                AttemptPlan {
                    variant: InputVariant::ThirdPerson,
                    sampling: SamplingConfig::new(600, 0.3, 0.7, 20),
                },
            ],
            retry_on_empty: true,
            retry_on_safety_block: true,
        }
    }
}

/// Content-safety thresholds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// One threshold per category.
    pub settings: Vec<SafetySetting>,
}

impl SafetyConfig {
    /// Same threshold for every category.
    #[must_use]
    pub fn uniform(threshold: BlockThreshold) -> Self {
        Self {
            settings: HarmCategory::ALL
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold,
                })
                .collect(),
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self::uniform(BlockThreshold::BlockFew)
    }
}

/// A whole-word, case-insensitive replacement.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TermSubstitution {
    /// Word or phrase to replace.
    pub term: String,
    /// Replacement text, inserted literally.
    pub replacement: String,
}

impl TermSubstitution {
    /// Build a substitution pair.
    #[must_use]
    pub fn new(term: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            replacement: replacement.into(),
        }
    }
}

/// Sanitizer settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Substitutions, applied in order.
    pub terms: Vec<TermSubstitution>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        let pairs = [
            ("payday loan", "short-term credit"),
            ("debts", "financial obligations"),
            ("debt", "financial obligations"),
            ("bankruptcy", "financial restructuring"),
            ("bankrupt", "going through financial restructuring"),
            ("broke", "financially constrained"),
            ("desperate", "concerned"),
            ("foreclosure", "housing payment difficulty"),
            ("poverty", "a limited income"),
        ];
        Self {
            terms: pairs
                .into_iter()
                .map(|(term, replacement)| TermSubstitution::new(term, replacement))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CoachConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.prompt.style, PromptStyle::Compact);
        assert_eq!(config.safety.settings.len(), 4);
    }

    #[test]
    fn test_plans_lower_temperature() {
        let retry = RetryConfig::default();
        let temps: Vec<f32> = retry.plans.iter().map(|p| p.sampling.temperature).collect();
        assert!(temps.windows(2).all(|w| w[0] > w[1]));
        let caps: Vec<u32> = retry
            .plans
            .iter()
            .map(|p| p.sampling.max_output_tokens)
            .collect();
        assert!(caps.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_plan_for_repeats_last() {
        let retry = RetryConfig::default();
        assert_eq!(retry.plan_for(0).variant, InputVariant::Raw);
        assert_eq!(retry.plan_for(2).variant, InputVariant::ThirdPerson);
        assert_eq!(retry.plan_for(7).variant, InputVariant::ThirdPerson);
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let retry = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        let config = CoachConfig::default().with_retry(retry);
        assert!(matches!(
            config.validate(),
            Err(CoachError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_tiny_char_limits() {
        let tiny = PromptConfig {
            max_message_chars: 1,
            ..PromptConfig::compact()
        };
        let config = CoachConfig::default().with_prompt(tiny);
        assert!(matches!(
            config.validate(),
            Err(CoachError::InvalidConfig(_))
        ));

        let smallest = PromptConfig {
            max_message_chars: MIN_CHAR_LIMIT,
            max_profile_value_chars: MIN_CHAR_LIMIT,
            ..PromptConfig::compact()
        };
        assert!(CoachConfig::default().with_prompt(smallest).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = CoachConfig::default();
        config.gemini.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(CoachError::Url(_))));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"prompt": {"style": "verbose", "history_window": 8}, "retry": {"delay_ms": 0}}"#;
        let config: CoachConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.prompt.style, PromptStyle::Verbose);
        assert_eq!(config.prompt.history_window, 8);
        assert_eq!(config.retry.delay_ms, 0);
        assert_eq!(config.retry.plans.len(), 3);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = CoachConfig::default();
        config.gemini.api_key = Some("secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
