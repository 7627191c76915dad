//! Anthropic API request and response types.

use serde::{Deserialize, Serialize};

/// A conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Role: "user" or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

/// Messages request.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    /// Model to use
    pub model: String,
    /// System prompt (top-level, not a message)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Conversation messages
    pub messages: Vec<ApiMessage>,
    /// Maximum tokens to generate (required by the API)
    pub max_tokens: u32,
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Messages response.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    /// Content blocks of the reply
    pub content: Vec<ContentBlock>,
}

/// A content block in the reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    /// Block type ("text" for plain replies)
    #[serde(rename = "type")]
    pub block_type: String,
    /// Text payload, present for text blocks
    pub text: Option<String>,
}

/// API error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Error details
    pub error: ApiErrorDetail,
}

/// API error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable error message
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_reply() {
        let body = r#"{"content":[{"type":"text","text":"Hello!"}],"role":"assistant"}"#;
        let response: MessagesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.content[0].text.as_deref(), Some("Hello!"));
    }

    #[test]
    fn system_prompt_is_top_level() {
        let request = MessagesRequest {
            model: "claude-3-5-haiku-latest".to_string(),
            system: Some("Be brief.".to_string()),
            messages: vec![],
            max_tokens: 256,
            temperature: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""system":"Be brief.""#));
        assert!(!json.contains("temperature"));
    }
}
