use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind
{   /// Caller configuration is wrong (missing key, bad settings)
    Configuration
  , /// Local construction failure (serialization, pattern compile)
    Local
  , /// Network failure before a status code was seen
    Transport
  , /// Remote service answered with a non-2xx status
    Protocol
  , /// A response body could not be decoded
    MalformedBody
  , /// The caller cancelled the exchange
    Cancelled
}

/// Error type for text shaping operations
#[derive(Debug, Error)]
pub enum Error
{   /// API key is missing or empty
    #[error("Missing API key: {0}")]
    MissingApiKey(String)
  , /// API key file could not be read
    #[error("failed to read API key file {path:?}: {source}")]
    ApiKeyFile
    {   path: PathBuf
      , #[source]
        source: std::io::Error
    }
  , /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String)
  , /// Request could not be serialized
    #[error("failed to marshal request body: {0}")]
    Serialize(#[source] serde_json::Error)
  , /// HTTP exchange failed
    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error)
  , /// Response body could not be read
    #[error("failed to read response body: {0}")]
    ReadBody(#[source] reqwest::Error)
  , /// API answered with a status code above 299
    #[error("unexpected status code: {code} '{message}'")]
    UnexpectedStatusCode
    {   code: u16
      , message: String
    }
  , /// Error body of a failed call was not valid JSON
    #[error("failed to unmarshal error response (status {code}): {source}")]
    MalformedErrorBody
    {   code: u16
      , #[source]
        source: serde_json::Error
    }
  , /// Success body was not a chat completion
    #[error("failed to unmarshal response body: {0}")]
    MalformedSuccessBody(#[source] serde_json::Error)
  , /// Exchange aborted by the caller
    #[error("request cancelled")]
    Cancelled
  , /// Chat completion request failed
    #[error("failed to send chat message: {0}")]
    Completion(#[source] Box<Error>)
  , /// Code block pattern failed to compile
    #[error("error compiling code block pattern: {0}")]
    CodeBlockPattern(#[source] regex::Error)
  , /// A batch job failed
    #[error("failed to shape {label}: {source}")]
    Job
    {   label: String
      , #[source]
        source: Box<Error>
    }
}

impl Error
{   /// Classify the error, looking through context wrappers
    pub fn kind(&self) -> ErrorKind
    {   match self
        {   Error::MissingApiKey(_)
          | Error::ApiKeyFile { .. }
          | Error::InvalidConfiguration(_) => ErrorKind::Configuration
          , Error::Serialize(_)
          | Error::CodeBlockPattern(_) => ErrorKind::Local
          , Error::Http(_)
          | Error::ReadBody(_) => ErrorKind::Transport
          , Error::UnexpectedStatusCode { .. } => ErrorKind::Protocol
          , Error::MalformedErrorBody { .. }
          | Error::MalformedSuccessBody(_) => ErrorKind::MalformedBody
          , Error::Cancelled => ErrorKind::Cancelled
          , Error::Completion(inner) => inner.kind()
          , Error::Job { source, .. } => source.kind()
        }
    }

    /// Status code and message of a rejected call, if this is one
    pub fn status(&self) -> Option<(u16, &str)>
    {   match self
        {   Error::UnexpectedStatusCode { code, message } => {
              Some((*code, message.as_str()))
            }
          , Error::Completion(inner) => inner.status()
          , Error::Job { source, .. } => source.status()
          , _ => None
        }
    }
}
