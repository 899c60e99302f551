//! Chat message model and sequence normalization.
//!
//! Providers reject histories that start with an assistant turn or
//! contain consecutive same-role messages, so every chat handler runs the
//! client-supplied history through [`normalize_messages`] before the
//! upstream call.

use serde::{Deserialize, Serialize};

/// Message author role on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One turn of conversation history, request-scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Normalize a history for upstream consumption:
///
/// 1. leading assistant turns are dropped,
/// 2. consecutive same-role messages collapse to the latest,
/// 3. a trailing assistant message is dropped.
///
/// System messages are passed through untouched; providers that take a
/// separate system field filter them out before calling this.
pub fn normalize_messages(messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut normalized: Vec<ChatMessage> = Vec::with_capacity(messages.len());

    for message in messages {
        if normalized.is_empty() && message.role == Role::Assistant {
            continue;
        }
        match normalized.last() {
            Some(last) if last.role == message.role => {
                // Keep the latest of a same-role run.
                *normalized.last_mut().unwrap() = message;
            }
            _ => normalized.push(message),
        }
    }

    if normalized.last().map(|m| m.role) == Some(Role::Assistant) {
        normalized.pop();
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_assistant_is_dropped() {
        let out = normalize_messages(vec![
            ChatMessage::assistant("hi"),
            ChatMessage::user("hello"),
        ]);
        assert_eq!(out, vec![ChatMessage::user("hello")]);
    }

    #[test]
    fn consecutive_same_role_collapse_to_latest() {
        let out = normalize_messages(vec![
            ChatMessage::assistant("stale"),
            ChatMessage::user("first"),
            ChatMessage::user("second"),
        ]);
        assert_eq!(out, vec![ChatMessage::user("second")]);
    }

    #[test]
    fn trailing_assistant_is_dropped() {
        let out = normalize_messages(vec![
            ChatMessage::user("q"),
            ChatMessage::assistant("a"),
        ]);
        assert_eq!(out, vec![ChatMessage::user("q")]);
    }

    #[test]
    fn alternating_history_is_untouched() {
        let history = vec![
            ChatMessage::user("q1"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("q2"),
        ];
        assert_eq!(normalize_messages(history.clone()), history);
    }

    #[test]
    fn never_starts_or_ends_with_assistant() {
        let out = normalize_messages(vec![
            ChatMessage::assistant("x"),
            ChatMessage::assistant("y"),
            ChatMessage::user("q"),
            ChatMessage::assistant("a"),
            ChatMessage::assistant("b"),
        ]);
        assert_eq!(out, vec![ChatMessage::user("q")]);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("hej")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hej"}"#);
    }
}
