//! Per-visitor chat session: full transcript, model context window and profile.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::coach::core::message::{ConversationHistory, Message};
use crate::coach::core::profile::UserProfile;

/// Number of recent messages kept as model context.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// One chat session.
#[derive(Clone, Debug, Serialize)]
pub struct ChatSession {
    /// Session identifier.
    pub id: Uuid,
    /// Every message exchanged, oldest first.
    pub transcript: Vec<Message>,
    /// Recent messages handed to the orchestrator.
    #[serde(skip)]
    pub history: ConversationHistory,
    /// Facts the visitor has shared.
    pub profile: UserProfile,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    history_limit: usize,
    #[serde(skip)]
    epoch: u64,
}

impl ChatSession {
    /// Create an empty session with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an empty session keeping `limit` messages of context.
    #[must_use]
    pub fn with_history_limit(limit: usize) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            transcript: Vec::new(),
            history: ConversationHistory::new(),
            profile: UserProfile::default(),
            created_at: now,
            updated_at: now,
            history_limit: limit,
            epoch: 0,
        }
    }

    /// Counter bumped by every [`ChatSession::clear`].
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Profile to pass to the orchestrator, `None` when nothing is known.
    #[must_use]
    pub fn profile_ref(&self) -> Option<&UserProfile> {
        (!self.profile.is_empty()).then_some(&self.profile)
    }

    /// Append a completed user/assistant exchange and rebuild the context window.
    pub fn record_turn(&mut self, user_input: &str, reply: &str) {
        self.transcript.push(Message::user(user_input));
        self.transcript.push(Message::assistant(reply));

        let start = self.transcript.len().saturating_sub(self.history_limit);
        self.history = self.transcript[start..].iter().cloned().collect();
        self.touch();
    }

    /// Replace the profile.
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
        self.touch();
    }

    /// Drop transcript, history and profile.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.history.clear();
        self.profile = UserProfile::default();
        self.epoch += 1;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::core::message::Role;

    #[test]
    fn test_record_turn_appends_pair() {
        let mut session = ChatSession::new();
        session.record_turn("hi", "hello!");

        assert_eq!(session.transcript.len(), 2);
        assert_eq!(session.transcript[0].role(), Role::User);
        assert_eq!(session.transcript[1].content(), "hello!");
        assert_eq!(session.history.len(), 2);
    }

    #[test]
    fn test_history_keeps_last_messages() {
        let mut session = ChatSession::with_history_limit(4);
        for i in 0..5 {
            session.record_turn(&format!("q{i}"), &format!("a{i}"));
        }

        assert_eq!(session.transcript.len(), 10);
        assert_eq!(session.history.len(), 4);
        assert_eq!(session.history.as_slice()[0].content(), "q3");
        assert_eq!(session.history.as_slice()[3].content(), "a4");
    }

    #[test]
    fn test_profile_ref_none_when_empty() {
        let mut session = ChatSession::new();
        assert!(session.profile_ref().is_none());

        session.set_profile(UserProfile {
            age: Some(41),
            ..UserProfile::default()
        });
        assert_eq!(session.profile_ref().and_then(|p| p.age), Some(41));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = ChatSession::new();
        session.record_turn("hi", "hello");
        session.set_profile(UserProfile {
            age: Some(30),
            ..UserProfile::default()
        });

        session.clear();
        assert!(session.transcript.is_empty());
        assert!(session.history.is_empty());
        assert!(session.profile.is_empty());
        assert!(session.updated_at >= session.created_at);
        assert_eq!(session.epoch(), 1);
    }
}
