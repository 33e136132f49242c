//! Request and response types for the Chatbase chat endpoint.

use serde::{Deserialize, Serialize};

/// Text used when a successful response carries no `text` field.
pub const NO_TEXT: &str = "No text in response";

/// Message used when an error response carries no `message` field.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub role: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: "user".to_string(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            role: "assistant".to_string(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub chatbot_id: String,
    pub stream: bool,
    pub temperature: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    /// Non-streaming, deterministic request for `chatbot_id`.
    pub fn new(chatbot_id: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            chatbot_id: chatbot_id.into(),
            stream: false,
            temperature: 0.0,
            conversation_id: None,
        }
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn conversation(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }
}

/// Successful response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub text: Option<String>,
}

impl ChatResponse {
    pub fn into_text(self) -> String {
        self.text.unwrap_or_else(|| NO_TEXT.to_string())
    }
}

/// Error response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Extract the `message` field from an error body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest::new("X5mqGdkfYYzpPO2R7Q5Jv").message(Message::user("Hello"));
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "messages": [{"content": "Hello", "role": "user"}],
                "chatbotId": "X5mqGdkfYYzpPO2R7Q5Jv",
                "stream": false,
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn test_request_with_conversation() {
        let request = ChatRequest::new("bot").conversation("c-1").temperature(0.5);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["conversationId"], "c-1");
        assert_eq!(body["temperature"], 0.5);
    }

    #[test]
    fn test_response_text() {
        let response: ChatResponse = serde_json::from_str(r#"{"text": "Quite smart."}"#).unwrap();
        assert_eq!(response.into_text(), "Quite smart.");

        let response: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.into_text(), NO_TEXT);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"message": "Invalid chatbot"}"#), "Invalid chatbot");
        assert_eq!(error_message("{}"), UNKNOWN_ERROR);
        assert_eq!(error_message("Bad Gateway"), UNKNOWN_ERROR);
    }
}
