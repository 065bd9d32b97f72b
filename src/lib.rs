//! textshape: shape and transform text with a chat completion API
//!
//! A shaping call takes an instruction and optional input text, sends it
//! to an OpenAI-compatible chat completions endpoint and returns the
//! cleaned result.
//!
//! ```text
//! Shaper::shape_text
//!   -> prompt::optimize_prompt        (optimized mode only)
//!   -> Shaper::request_completion     (continuation policy)
//!     -> GenerativeClient             (providers::openai::ChatClient)
//!       -> request codec              (JSON wire types)
//!   -> response::optimize_response    (optimized mode only)
//!   -> ShapeResult
//! ```

pub mod error;
pub mod config;
pub mod logging;
pub mod request;
pub mod client;
pub mod providers;
pub mod continuation;
pub mod prompt;
pub mod response;
pub mod shaper;
pub mod runner;

pub use client::GenerativeClient;
pub use config::{ApiKey, ApiLogLevel, ClientConfig, ShaperConfig};
pub use error::{Error, ErrorKind, Result};
pub use providers::ChatClient;
pub use runner::{Runner, ShapeJob};
pub use shaper::{ShapeMode, ShapeResult, Shaper};

/// Shaper backed by the OpenAI chat client
pub type OpenAiShaper = Shaper<ChatClient>;

/// Build a shaper talking to the configured chat completions endpoint
pub fn openai_shaper(
  api_key: ApiKey
, client_config: ClientConfig
, shaper_config: &ShaperConfig
) -> Result<OpenAiShaper>
{   let client = ChatClient::new(api_key, client_config)?;
    Ok(Shaper::new(client, shaper_config))
}
