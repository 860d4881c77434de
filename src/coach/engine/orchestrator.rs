//! Conversation orchestrator: one user turn in, one displayable reply out.

use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::coach::core::config::CoachConfig;
use crate::coach::core::errors::CoachResult;
use crate::coach::core::message::ConversationHistory;
use crate::coach::core::profile::UserProfile;
use crate::coach::engine::attempt::{
    AttemptOutcome, GenerationAttempt, OutcomeKind, classify, render_variant,
};
use crate::coach::fallback::{self, RECITATION_NOTICE, Topic, match_topic};
use crate::coach::prompt::build_prompt;
use crate::coach::sanitize::Sanitizer;
use crate::llm::backend::TextGenerator;
use crate::llm::gemini::GeminiClient;
use crate::llm::types::GenerationRequest;

/// Where a reply's text came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplySource {
    /// Remote model text from the given one-based attempt.
    Model {
        /// Attempt that succeeded.
        attempt: usize,
    },
    /// Keyword-matched template; `None` means the general template.
    TopicFallback {
        /// Matched topic.
        topic: Option<Topic>,
    },
    /// Notice asking the user to narrow the question.
    RecitationNotice,
    /// General guidance after a non-retryable block or empty result.
    GeneralGuidance,
}

/// A reply with the attempts that produced it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reply {
    /// Non-empty text to display.
    pub text: String,
    /// Origin of the text.
    pub source: ReplySource,
    /// Remote attempts made, in order.
    pub attempts: Vec<GenerationAttempt>,
}

/// Resolves user turns into replies, retrying the remote model and falling back locally.
pub struct CoachOrchestrator {
    config: CoachConfig,
    generator: Arc<dyn TextGenerator>,
    sanitizer: Sanitizer,
}

impl CoachOrchestrator {
    /// Create an orchestrator over any generator.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or a sanitizer term fails to compile.
    pub fn new(config: CoachConfig, generator: Arc<dyn TextGenerator>) -> CoachResult<Self> {
        config.validate()?;
        let sanitizer = Sanitizer::new(&config.sanitizer)?;
        Ok(Self {
            config,
            generator,
            sanitizer,
        })
    }

    /// Create an orchestrator backed by the Gemini client.
    ///
    /// Succeeds without an API key; turns then fall back to local guidance.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the client cannot be built.
    pub fn with_gemini(config: CoachConfig) -> CoachResult<Self> {
        config.validate()?;
        let client = GeminiClient::new(&config.gemini)?;
        if !client.has_api_key() {
            warn!("no Gemini API key configured, every turn will use local guidance");
        }
        Self::new(config, Arc::new(client))
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CoachConfig {
        &self.config
    }

    /// Reply text for one user turn. Never empty, never an error.
    #[must_use]
    pub fn generate(
        &self,
        user_input: &str,
        history: &ConversationHistory,
        profile: Option<&UserProfile>,
    ) -> String {
        self.generate_reply(user_input, history, profile).text
    }

    /// Reply for one user turn, with its source and attempt log.
    #[must_use]
    pub fn generate_reply(
        &self,
        user_input: &str,
        history: &ConversationHistory,
        profile: Option<&UserProfile>,
    ) -> Reply {
        let retry = &self.config.retry;
        let delay = Duration::from_millis(retry.delay_ms);
        let mut attempts = Vec::with_capacity(retry.max_attempts);

        for idx in 0..retry.max_attempts {
            if idx > 0 && !delay.is_zero() {
                sleep(delay);
            }

            let plan = retry.plan_for(idx);
            let text = render_variant(plan.variant, user_input, &self.sanitizer);
            let request = GenerationRequest {
                prompt: build_prompt(&self.config.prompt, &text, history, profile),
                sampling: plan.sampling,
                safety: self.config.safety.settings.clone(),
            };

            debug!(
                attempt = idx + 1,
                variant = plan.variant.as_str(),
                temperature = plan.sampling.temperature,
                max_output_tokens = plan.sampling.max_output_tokens,
                generator = self.generator.name(),
                "requesting generation"
            );

            let outcome = classify(self.generator.generate(&request));
            attempts.push(GenerationAttempt {
                number: idx + 1,
                variant: plan.variant,
                sampling: plan.sampling,
                outcome: outcome.kind(),
            });

            match outcome {
                AttemptOutcome::Success(reply) => {
                    info!(attempt = idx + 1, "model reply accepted");
                    return Self::finish(
                        reply,
                        ReplySource::Model { attempt: idx + 1 },
                        profile,
                        attempts,
                    );
                }
                AttemptOutcome::TransportError { message, retryable } => {
                    warn!(attempt = idx + 1, retryable, "generation call failed: {message}");
                    if !retryable {
                        return Self::topic_fallback(user_input, profile, attempts);
                    }
                }
                AttemptOutcome::Empty => {
                    if !retry.retry_on_empty {
                        return Self::general(profile, attempts);
                    }
                }
                AttemptOutcome::SafetyBlocked => {
                    info!(attempt = idx + 1, "generation blocked by safety filter");
                    if !retry.retry_on_safety_block {
                        return Self::topic_fallback(user_input, profile, attempts);
                    }
                }
                AttemptOutcome::RecitationBlocked => {
                    info!(attempt = idx + 1, "generation withheld for recitation");
                    return Self::finish(
                        RECITATION_NOTICE.to_string(),
                        ReplySource::RecitationNotice,
                        profile,
                        attempts,
                    );
                }
                AttemptOutcome::OtherBlocked => {
                    return Self::general(profile, attempts);
                }
            }
        }

        let last = attempts.last().map(|a| a.outcome);
        warn!(
            attempts = attempts.len(),
            last_outcome = last.map_or_else(String::new, |kind: OutcomeKind| kind.to_string()),
            "remote attempts exhausted, using fallback"
        );
        Self::topic_fallback(user_input, profile, attempts)
    }

    fn topic_fallback(
        user_input: &str,
        profile: Option<&UserProfile>,
        attempts: Vec<GenerationAttempt>,
    ) -> Reply {
        let topic = match_topic(user_input);
        Self::finish(
            fallback::fallback(user_input, profile),
            ReplySource::TopicFallback { topic },
            profile,
            attempts,
        )
    }

    fn general(profile: Option<&UserProfile>, attempts: Vec<GenerationAttempt>) -> Reply {
        Self::finish(
            fallback::general_guidance(profile),
            ReplySource::GeneralGuidance,
            profile,
            attempts,
        )
    }

    fn finish(
        text: String,
        source: ReplySource,
        profile: Option<&UserProfile>,
        attempts: Vec<GenerationAttempt>,
    ) -> Reply {
        if text.trim().is_empty() {
            return Reply {
                text: fallback::general_guidance(profile),
                source: ReplySource::GeneralGuidance,
                attempts,
            };
        }
        Reply {
            text,
            source,
            attempts,
        }
    }
}
