//! Configuration for the chat client and the shaper
//!
//! Everything here is built once and then only read. Concurrent shaping
//! calls can share the same configuration.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o";

pub const DEFAULT_ENDPOINT: &str
  = "https://api.openai.com/v1/chat/completions";

pub const DEFAULT_API_KEY_VAR: &str = "OPENAI_API_KEY";

pub const DEFAULT_CONTINUE_DIRECTIVE: &str
  = "Continue from where you left off.";

/// How much of the API exchange gets logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiLogLevel
{   /// Nothing is logged by the API hook
    #[default]
    Off
  , /// One-line summaries of request and response
    Info
  , /// Raw request and response bodies
    Debug
}

impl FromStr for ApiLogLevel
{   type Err = Error;

    fn from_str(s: &str) -> Result<Self>
    {   match s.trim().to_ascii_lowercase().as_str()
        {   "" | "off" => Ok(ApiLogLevel::Off)
          , "info" => Ok(ApiLogLevel::Info)
          , "debug" => Ok(ApiLogLevel::Debug)
          , other => Err(Error::InvalidConfiguration(
              format!("unknown API log level: {}", other)
            ))
        }
    }
}

/// Bearer token for the completion API
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey
{   /// Wrap a key, rejecting empty ones
    pub fn new(key: impl Into<String>) -> Result<Self>
    {   let key = key.into().trim().to_string();
        if key.is_empty()
        {   return Err(Error::MissingApiKey(
              "empty API key".to_string()
            ));
        }
        Ok(ApiKey(key))
    }

    /// Read the key from an environment variable
    pub fn from_env(var: &str) -> Result<Self>
    {   debug!("Reading API key from ${}", var);
        let key = std::env::var(var)
          .map_err(|_| Error::MissingApiKey(
            format!("environment variable {} not set", var)
          ))?;
        ApiKey::new(key)
    }

    /// Read the key from a file, ignoring surrounding whitespace
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self>
    {   let path = path.as_ref();
        debug!("Reading API key from {:?}", path);
        let contents = std::fs::read_to_string(path)
          .map_err(|source| Error::ApiKeyFile
          {   path: path.to_path_buf()
            , source
          })?;
        ApiKey::new(contents)
          .map_err(|_| Error::MissingApiKey(
            format!("API key file {:?} is empty", path)
          ))
    }

    pub fn expose(&self) -> &str
    {   &self.0
    }
}

impl fmt::Debug for ApiKey
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f, "ApiKey(***)")
    }
}

/// Response format requested from the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFormat
{   #[serde(rename = "type")]
    pub kind: String
}

impl Default for ResponseFormat
{   fn default() -> Self
    {   ResponseFormat { kind: "text".to_string() }
    }
}

impl fmt::Display for ResponseFormat
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f, "{}", self.kind)
    }
}

/// Chat client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig
{   /// Model to use for text generation
    pub model: String
  , /// Max tokens to generate, `None` leaves it to the API; 0 reads as `None`
    #[serde(deserialize_with = "deserialize_max_tokens")]
    pub max_tokens: Option<u32>
  , /// Number of choices to ask for
    pub n: u32
  , /// Sampling seed
    pub seed: i64
  , /// Response format
    pub response_format: ResponseFormat
  , /// API logging hook level
    pub log_level: ApiLogLevel
  , /// Chat completions endpoint
    pub endpoint: String
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
}

impl Default for ClientConfig
{   fn default() -> Self
    {   ClientConfig
        {   model: DEFAULT_MODEL.to_string()
          , max_tokens: None
          , n: 1
          , seed: 0
          , response_format: ResponseFormat::default()
          , log_level: ApiLogLevel::Off
          , endpoint: DEFAULT_ENDPOINT.to_string()
          , timeout_secs: None
        }
    }
}

impl ClientConfig
{   /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self
    {   self.model = model.into();
        self
    }

    /// Set the token cap; 0 means no cap
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self
    {   self.max_tokens = (max_tokens > 0).then_some(max_tokens);
        self
    }

    /// Set the API log level
    pub fn with_log_level(mut self, log_level: ApiLogLevel) -> Self
    {   self.log_level = log_level;
        self
    }

    /// Point the client at another endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self
    {   self.endpoint = endpoint.into();
        self
    }

    /// Check the settings before building a client
    pub fn validate(&self) -> Result<()>
    {   if self.model.trim().is_empty()
        {   return Err(Error::InvalidConfiguration(
              "model must not be empty".to_string()
            ));
        }
        if self.endpoint.trim().is_empty()
        {   return Err(Error::InvalidConfiguration(
              "endpoint must not be empty".to_string()
            ));
        }
        if self.n == 0
        {   return Err(Error::InvalidConfiguration(
              "n must be at least 1".to_string()
            ));
        }
        Ok(())
    }
}

fn deserialize_max_tokens<'de, D>(deserializer: D)
  -> std::result::Result<Option<u32>, D::Error>
where
  D: serde::Deserializer<'de>
{   let max_tokens = Option::<u32>::deserialize(deserializer)?;
    Ok(max_tokens.filter(|&n| n > 0))
}

/// Shaper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaperConfig
{   /// Max requests per shaping call when output is truncated
    pub max_completion_repeat_count: usize
  , /// Keep only the first fenced code block of the result
    pub use_first_code_block: bool
  , /// Wrap the prompt and post-process the result
    pub prompt_optimize: bool
  , /// System message sent when asking for a continuation
    pub continue_directive: String
}

impl Default for ShaperConfig
{   fn default() -> Self
    {   ShaperConfig
        {   max_completion_repeat_count: 1
          , use_first_code_block: false
          , prompt_optimize: true
          , continue_directive: DEFAULT_CONTINUE_DIRECTIVE.to_string()
        }
    }
}
