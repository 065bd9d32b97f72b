//! Chat completion wire types and their JSON codec

use serde::{Deserialize, Serialize};
use crate::config::ResponseFormat;
use crate::error::{Error, Result};

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

/// Finish reason reported when output hit the length limit
pub const FINISH_REASON_LENGTH: &str = "length";

// ===== Request =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

impl ChatMessage
{   pub fn new(role: &str, content: impl Into<String>) -> Self
    {   ChatMessage
        {   role: role.to_string()
          , content: content.into()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChatCompletion
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>
  , pub n: u32
  , pub seed: i64
  , pub response_format: ResponseFormat
  , pub stream: bool
}

impl CreateChatCompletion
{   /// Single user message request
    pub fn new(
      model: impl Into<String>
    , prompt: impl Into<String>
    , max_tokens: Option<u32>
    ) -> Self
    {   CreateChatCompletion
        {   model: model.into()
          , messages: vec![ChatMessage::new(ROLE_USER, prompt)]
          , max_tokens
          , n: 1
          , seed: 0
          , response_format: ResponseFormat::default()
          , stream: false
        }
    }
}

// ===== Success response =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice
{   pub index: u32
  , pub message: ChatMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

impl Choice
{   /// Output was cut off by the length limit
    pub fn is_truncated(&self) -> bool
    {   self.finish_reason.as_deref() == Some(FINISH_REASON_LENGTH)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage
{   pub prompt_tokens: u64
  , pub completion_tokens: u64
  , pub total_tokens: u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletion
{   #[serde(default)]
    pub id: String
  , #[serde(default)]
    pub object: String
  , #[serde(default)]
    pub created: i64
  , #[serde(default)]
    pub model: String
  , #[serde(default)]
    pub system_fingerprint: Option<String>
  , #[serde(default)]
    pub choices: Vec<Choice>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>
}

impl ChatCompletion
{   pub fn first_choice(&self) -> Option<&Choice>
    {   self.choices.first()
    }
}

// ===== Error response =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail
{   pub message: String
  , #[serde(default, rename = "type")]
    pub kind: Option<String>
  , #[serde(default)]
    pub param: Option<String>
  , #[serde(default)]
    pub code: Option<String>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse
{   pub error: ApiErrorDetail
}

// ===== Codec =====

/// Serialize a request into its JSON body
pub fn encode_request(request: &CreateChatCompletion) -> Result<Vec<u8>>
{   serde_json::to_vec(request).map_err(Error::Serialize)
}

/// Parse a 2xx response body
pub fn decode_completion(body: &[u8]) -> Result<ChatCompletion>
{   serde_json::from_slice(body).map_err(Error::MalformedSuccessBody)
}

/// Parse the body of a failed call into its message
pub fn decode_error(code: u16, body: &[u8]) -> Result<ErrorResponse>
{   serde_json::from_slice(body)
      .map_err(|source| Error::MalformedErrorBody { code, source })
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn request_omits_absent_max_tokens()
    {   let request = CreateChatCompletion::new("gpt-4o", "hi", None);
        let body = encode_request(&request).unwrap();
        let value: serde_json::Value
          = serde_json::from_slice(&body).unwrap();
        assert!(value.get("max_tokens").is_none());
        assert_eq!(value["stream"], false);
        assert_eq!(value["n"], 1);
        assert_eq!(value["response_format"]["type"], "text");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
    }

    #[test]
    fn request_keeps_max_tokens_when_set()
    {   let request = CreateChatCompletion::new("gpt-4o", "hi", Some(64));
        let body = encode_request(&request).unwrap();
        let value: serde_json::Value
          = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["max_tokens"], 64);
    }

    #[test]
    fn completion_decodes_and_flags_truncation()
    {   let body = br#"{
          "id": "chatcmpl-1",
          "object": "chat.completion",
          "created": 1700000000,
          "model": "gpt-4o",
          "system_fingerprint": "fp_1",
          "choices": [
            { "index": 0,
              "message": { "role": "assistant", "content": "part" },
              "finish_reason": "length" }
          ],
          "usage": { "prompt_tokens": 3, "completion_tokens": 5, "total_tokens": 8 }
        }"#;
        let completion = decode_completion(body).unwrap();
        let choice = completion.first_choice().unwrap();
        assert_eq!(choice.message.content, "part");
        assert!(choice.is_truncated());
        assert_eq!(completion.usage.unwrap().total_tokens, 8);
    }

    #[test]
    fn malformed_bodies_are_distinct()
    {   assert!(matches!(
          decode_completion(b"not json")
        , Err(Error::MalformedSuccessBody(_))
        ));
        assert!(matches!(
          decode_error(502, b"<html>")
        , Err(Error::MalformedErrorBody { code: 502, .. })
        ));
    }

    #[test]
    fn error_body_decodes_message()
    {   let parsed = decode_error(
          400
        , br#"{"error":{"message":"bad request","type":"invalid_request_error"}}"#
        ).unwrap();
        assert_eq!(parsed.error.message, "bad request");
        assert_eq!(parsed.error.kind.as_deref(), Some("invalid_request_error"));
    }
}
