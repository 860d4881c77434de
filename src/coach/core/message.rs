//! Chat messages and the windowed history handed to the orchestrator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The person asking for guidance.
    User,
    /// The coach.
    Assistant,
}

impl Role {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Speaker label used when rendering a transcript into a prompt.
    #[must_use]
    pub const fn speaker(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(value.to_string()),
        }
    }
}

/// A single immutable chat message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    /// Build a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Author of the message.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Message text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered view of recent messages used as model context.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    /// Create an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Append a message at the end.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The last `n` messages, oldest first.
    #[must_use]
    pub fn window(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Drop everything but the last `n` messages.
    pub fn retain_last(&mut self, n: usize) {
        let start = self.messages.len().saturating_sub(n);
        self.messages.drain(..start);
    }

    /// Remove every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the history holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Messages as a slice, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }
}

impl From<Vec<Message>> for ConversationHistory {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl FromIterator<Message> for ConversationHistory {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConversationHistory {
        vec![
            Message::user("one"),
            Message::assistant("two"),
            Message::user("three"),
        ]
        .into()
    }

    #[test]
    fn test_window_returns_tail() {
        let history = sample();
        let window = history.window(2);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].content(), "two");
        assert_eq!(window[1].content(), "three");
    }

    #[test]
    fn test_window_larger_than_history() {
        let history = sample();
        assert_eq!(history.window(10).len(), 3);
        assert!(ConversationHistory::new().window(4).is_empty());
    }

    #[test]
    fn test_retain_last() {
        let mut history = sample();
        history.retain_last(1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.as_slice()[0].content(), "three");
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("assistant".parse::<Role>(), Ok(Role::Assistant));
        assert_eq!(Role::User.to_string(), "user");
        assert!("system".parse::<Role>().is_err());
    }

    #[test]
    fn test_history_serializes_as_array() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.starts_with("[{\"role\":\"user\""));
    }
}
