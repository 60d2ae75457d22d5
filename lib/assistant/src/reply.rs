//! Reply types for the floating assistant.

use serde::{Deserialize, Serialize};

/// The speaking role attached to a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyRole {
    /// The assistant itself; the only role replies ever carry.
    Assistant,
}

/// A structured assistant reply.
///
/// This is the wire shape of the chat endpoint:
/// `{"role": "assistant", "text": ..., "suggestedPage": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReply {
    /// Always [`ReplyRole::Assistant`].
    pub role: ReplyRole,
    /// The reply text shown in the chat window.
    pub text: String,
    /// A page the UI may offer to navigate to.
    #[serde(rename = "suggestedPage", skip_serializing_if = "Option::is_none")]
    pub suggested_page: Option<String>,
}

impl ToolReply {
    /// Creates a plain text reply.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            role: ReplyRole::Assistant,
            text: text.into(),
            suggested_page: None,
        }
    }

    /// Creates a reply with a navigation suggestion.
    #[must_use]
    pub fn navigation(text: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            role: ReplyRole::Assistant,
            text: text.into(),
            suggested_page: Some(page.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_uses_camel_case_suggested_page() {
        let reply = ToolReply::navigation("Head this way.", "/business-info");
        let json = serde_json::to_string(&reply).expect("serialize");

        assert!(json.contains(r#""role":"assistant""#));
        assert!(json.contains(r#""suggestedPage":"/business-info""#));
    }

    #[test]
    fn plain_reply_omits_suggested_page() {
        let json = serde_json::to_string(&ToolReply::text("Hello.")).expect("serialize");
        assert!(!json.contains("suggestedPage"));
    }
}
