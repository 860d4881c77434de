//! Prompt construction for a single chat turn.

use crate::coach::core::config::{PromptConfig, PromptStyle};
use crate::coach::core::message::{ConversationHistory, Message};
use crate::coach::core::profile::{NOT_SPECIFIED, UserProfile};
use crate::coach::prompt::persona::{COMPACT_PERSONA, VERBOSE_PERSONA};

/// Marker appended to truncated text.
const ELLIPSIS: &str = "...";

/// Build the full prompt text for one attempt.
///
/// `user_input` is the (possibly rewritten) text of the current turn; it is never truncated.
#[must_use]
pub fn build_prompt(
    config: &PromptConfig,
    user_input: &str,
    history: &ConversationHistory,
    profile: Option<&UserProfile>,
) -> String {
    let mut out = String::with_capacity(2048);

    match config.style {
        PromptStyle::Verbose => {
            out.push_str(VERBOSE_PERSONA);
            out.push_str("\n\nUser Profile:\n");
            let summary = render_profile(config, profile, "\n");
            out.push_str(summary.as_deref().unwrap_or(NOT_SPECIFIED));
            out.push_str("\n\nConversation History:\n");
        }
        PromptStyle::Compact => {
            out.push_str(COMPACT_PERSONA);
            if let Some(summary) = render_profile(config, profile, "; ") {
                out.push_str("\nProfile: ");
                out.push_str(&summary);
            }
            out.push_str("\n\n");
        }
    }

    for message in history.window(config.history_window) {
        render_turn(&mut out, message, config.max_message_chars);
    }

    out.push_str("\nUser: ");
    out.push_str(user_input.trim());
    out.push_str("\nAssistant:");
    out
}

/// Compact `Name: value` rendering of set profile fields, or `None` when nothing is set.
#[must_use]
pub fn render_profile(
    config: &PromptConfig,
    profile: Option<&UserProfile>,
    separator: &str,
) -> Option<String> {
    let fields = profile?.specified_fields();
    if fields.is_empty() {
        return None;
    }

    let rendered: Vec<String> = fields
        .into_iter()
        .take(config.max_profile_fields)
        .map(|(name, value)| {
            format!(
                "{name}: {}",
                truncate_chars(&value, config.max_profile_value_chars)
            )
        })
        .collect();

    Some(rendered.join(separator))
}

fn render_turn(out: &mut String, message: &Message, max_chars: usize) {
    out.push_str(message.role().speaker());
    out.push_str(": ");
    out.push_str(&truncate_chars(message.content().trim(), max_chars));
    out.push('\n');
}

/// Truncate to at most `max_chars` characters, marking the cut with an ellipsis
/// when the cap leaves room for one.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push_str(ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            age: Some(30),
            annual_income: Some("$50,000 - $75,000".to_string()),
            ..UserProfile::default()
        }
    }

    fn long_history(n: usize) -> ConversationHistory {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("question {i}"))
                } else {
                    Message::assistant(format!("answer {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn test_compact_prompt_layout() {
        let history = long_history(6);
        let prompt = build_prompt(
            &PromptConfig::compact(),
            "How much should I save?",
            &history,
            Some(&profile()),
        );

        assert!(prompt.starts_with(COMPACT_PERSONA));
        assert!(prompt.contains("Profile: Age: 30; Income: $50,000 - $75,000"));
        assert!(!prompt.contains("question 0"));
        assert!(!prompt.contains("answer 1"));
        assert!(prompt.contains("User: question 2\n"));
        assert!(prompt.contains("Assistant: answer 5\n"));
        assert!(prompt.ends_with("User: How much should I save?\nAssistant:"));
    }

    #[test]
    fn test_verbose_prompt_layout() {
        let history = long_history(12);
        let prompt = build_prompt(&PromptConfig::verbose(), "Hi", &history, None);

        assert!(prompt.starts_with(VERBOSE_PERSONA));
        assert!(prompt.contains("User Profile:\nnot specified"));
        assert!(prompt.contains("Conversation History:\n"));
        assert!(!prompt.contains("question 0\n"));
        assert!(prompt.contains("User: question 2\n"));
        assert!(prompt.ends_with("User: Hi\nAssistant:"));
    }

    #[test]
    fn test_compact_without_profile_omits_line() {
        let prompt = build_prompt(
            &PromptConfig::compact(),
            "Hi",
            &ConversationHistory::new(),
            Some(&UserProfile::default()),
        );
        assert!(!prompt.contains("Profile:"));
    }

    #[test]
    fn test_history_messages_truncated() {
        let history: ConversationHistory = vec![Message::user("x".repeat(400))].into();
        let config = PromptConfig::compact();
        let prompt = build_prompt(&config, "next", &history, None);

        let line = prompt
            .lines()
            .find(|l| l.starts_with("User: x"))
            .unwrap();
        assert_eq!(line.chars().count(), "User: ".len() + config.max_message_chars);
        assert!(line.ends_with("..."));
    }

    #[test]
    fn test_truncate_never_exceeds_cap() {
        assert_eq!(truncate_chars("retirement", 10), "retirement");
        assert_eq!(truncate_chars("retirement", 7), "reti...");
        assert_eq!(truncate_chars("retirement", 3), "ret");
        assert_eq!(truncate_chars("retirement", 1), "r");
        assert_eq!(truncate_chars("retirement", 0), "");
        for cap in 0..12 {
            assert!(truncate_chars("retirement planning", cap).chars().count() <= cap);
        }
    }

    #[test]
    fn test_profile_field_cap() {
        let full = UserProfile {
            age: Some(52),
            career_stage: Some("late career".to_string()),
            annual_income: Some("Over $150,000".to_string()),
            current_savings: Some("$250,000 - $500,000".to_string()),
            target_retirement_age: Some(62),
            risk_tolerance: Some(crate::coach::core::profile::RiskTolerance::Moderate),
            goals: ["travel".to_string()].into_iter().collect(),
        };
        let config = PromptConfig {
            max_profile_fields: 3,
            max_profile_value_chars: 10,
            ..PromptConfig::compact()
        };

        let summary = render_profile(&config, Some(&full), "; ").unwrap();
        assert_eq!(summary.split("; ").count(), 3);
        assert!(summary.contains("Income: Over $1..."));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 8), "hello...");
        assert_eq!(truncate_chars("héllo wörld", 9), "héllo...");
    }
}
