//! Outward streaming frame envelope.

use serde::{Deserialize, Serialize};

use crate::sources::Source;

/// One discrete unit of the outward streaming protocol.
///
/// Frames are emitted strictly in generation order. `Completed` is always
/// the last frame and is the only one carrying the authoritative
/// `fullText` and `sources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    /// An incremental piece of the answer text.
    Text { content: String },

    /// Search/grounding is in progress; emitted before any text when the
    /// provider returned citations.
    SearchStart { message: String },

    /// Terminal frame with the full accumulated text and sources.
    Completed {
        #[serde(rename = "fullText")]
        full_text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        sources: Vec<Source>,
    },

    /// Terminal frame for a mid-stream failure.
    Error { error: String },
}

impl Frame {
    pub fn text(content: impl Into<String>) -> Self {
        Frame::Text {
            content: content.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Frame::Completed { .. } | Frame::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_serialize_with_type_tag() {
        let json = serde_json::to_string(&Frame::text("ahoj")).unwrap();
        assert_eq!(json, r#"{"type":"text","content":"ahoj"}"#);
    }

    #[test]
    fn completed_uses_camel_case_full_text() {
        let frame = Frame::Completed {
            full_text: "done".into(),
            sources: Vec::new(),
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains(r#""fullText":"done""#));
        assert!(!json.contains("sources"));
    }

    #[test]
    fn completed_round_trips_sources() {
        let frame = Frame::Completed {
            full_text: "x".into(),
            sources: vec![Source::new("Title", "https://example.com/a")],
        };
        let json = serde_json::to_string(&frame).unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, back);
    }
}
