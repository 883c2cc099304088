//! Wire types of the chat-session backend.

use serde::{Deserialize, Serialize};

pub const ASSISTANT_ROLE: &str = "assistant";
pub const TEXT_PART: &str = "text";
pub const SESSION_IDLE_EVENT: &str = "session.idle";

/// `POST /session` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub id: String,
}

/// `POST /session/{id}/message` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptRequest {
    pub model: ModelSpec,
    pub parts: Vec<TextPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    #[serde(rename = "providerID")]
    pub provider_id: String,
    #[serde(rename = "modelID")]
    pub model_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPart {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl TextPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: TEXT_PART,
            text: text.into(),
        }
    }
}

/// One entry of `GET /session/{id}/message`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionMessage {
    pub info: MessageInfo,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageInfo {
    #[serde(default)]
    pub id: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessagePart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Payload of one `data:` line on `GET /event`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl StreamEvent {
    /// Session id carried by a `session.idle` event.
    pub fn idle_session_id(&self) -> Option<&str> {
        if self.kind != SESSION_IDLE_EVENT {
            return None;
        }
        self.properties.get("sessionID")?.as_str()
    }
}

/// Concatenates all text parts of assistant messages, trimmed.
pub fn extract_assistant_text(messages: &[SessionMessage]) -> String {
    let mut text = String::new();
    for message in messages.iter().filter(|m| m.info.role == ASSISTANT_ROLE) {
        for part in message.parts.iter().filter(|p| p.kind == TEXT_PART) {
            if let Some(chunk) = part.text.as_deref() {
                text.push_str(chunk);
            }
        }
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{extract_assistant_text, ModelSpec, PromptRequest, SessionMessage, TextPart};
    use serde_json::json;

    #[test]
    fn prompt_request_uses_backend_field_names() {
        let request = PromptRequest {
            model: ModelSpec {
                provider_id: "github-copilot".to_string(),
                model_id: "claude-sonnet-4".to_string(),
            },
            parts: vec![TextPart::text("hello")],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": {"providerID": "github-copilot", "modelID": "claude-sonnet-4"},
                "parts": [{"type": "text", "text": "hello"}]
            })
        );
    }

    #[test]
    fn extraction_keeps_only_assistant_text_parts() {
        let messages: Vec<SessionMessage> = serde_json::from_value(json!([
            {"info": {"id": "m1", "role": "user"}, "parts": [{"type": "text", "text": "prompt"}]},
            {"info": {"id": "m2", "role": "assistant"}, "parts": [
                {"type": "step-start"},
                {"type": "text", "text": "  Shipped the "},
                {"type": "reasoning", "text": "hidden"},
                {"type": "text", "text": "release.  "}
            ]}
        ]))
        .unwrap();
        assert_eq!(extract_assistant_text(&messages), "Shipped the release.");
    }

    #[test]
    fn extraction_of_no_assistant_messages_is_empty() {
        let messages: Vec<SessionMessage> = serde_json::from_value(json!([
            {"info": {"id": "m1", "role": "user"}, "parts": []}
        ]))
        .unwrap();
        assert!(extract_assistant_text(&messages).is_empty());
    }
}
