//! Deterministic canned guidance used when the model gives no usable reply.
//!
//! - `topics`: ordered keyword table mapping a topic to its template
//! - `templates`: static prose with profile placeholders
//! - `context`: profile values and derived figures

pub mod context;
pub mod templates;
pub mod topics;

pub use context::{DEFAULT_AGE, DEFAULT_TARGET_AGE, TemplateContext, stock_percent};
pub use templates::RECITATION_NOTICE;
pub use topics::{TOPIC_RULES, Topic, TopicRule, match_topic};

use crate::coach::core::profile::UserProfile;

/// Keyword-matched guidance for the input, or the general template.
///
/// Pure: identical input and profile always give identical text.
#[must_use]
pub fn fallback(user_input: &str, profile: Option<&UserProfile>) -> String {
    let ctx = TemplateContext::from_profile(profile);
    match match_topic(user_input) {
        Some(topic) => topic.render(&ctx),
        None => templates::general_guidance(&ctx),
    }
}

/// General guidance, independent of the input.
#[must_use]
pub fn general_guidance(profile: Option<&UserProfile>) -> String {
    templates::general_guidance(&TemplateContext::from_profile(profile))
}
