use std::future::Future;
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error, info, trace};
use crate::client::GenerativeClient;
use crate::config::{ApiKey, ApiLogLevel, ClientConfig};
use crate::error::{Error, Result};
use crate::request::{
  decode_completion, decode_error, encode_request
, ChatCompletion, CreateChatCompletion
};

/// Chat completions client for the OpenAI API
#[derive(Debug, Clone)]
pub struct ChatClient
{   api_key: ApiKey
  , config: ClientConfig
  , http_client: reqwest::Client
}

impl ChatClient
{   /// Create a client from a key and a validated configuration
    pub fn new(api_key: ApiKey, config: ClientConfig) -> Result<Self>
    {   config.validate()?;
        debug!(
          "Creating ChatClient for model {} at {}"
        , config.model, config.endpoint
        );
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          Error::InvalidConfiguration(e.to_string())
        })?;
        Ok(ChatClient
        {   api_key
          , config
          , http_client
        })
    }

    pub fn config(&self) -> &ClientConfig
    {   &self.config
    }

    /// Like `request_chat_completion`, but gives up when `cancel` resolves
    ///
    /// The in-flight HTTP exchange is dropped on cancellation.
    pub async fn request_chat_completion_until<F>(
      &self
    , request: &CreateChatCompletion
    , cancel: F
    ) -> Result<ChatCompletion>
    where
      F: Future<Output = ()> + Send
    {   tokio::select!
        { biased;
          _ = cancel => {
            info!("Chat completion cancelled");
            Err(Error::Cancelled)
          }
        , result = self.send(request) => result
        }
    }

    async fn send(
      &self
    , request: &CreateChatCompletion
    ) -> Result<ChatCompletion>
    {   let body = encode_request(request)?;
        self.log_request(request, &body);

        let response = self.http_client
          .post(&self.config.endpoint)
          .header("Content-Type", "application/json")
          .header(
            "Authorization"
          , format!("Bearer {}", self.api_key.expose())
          )
          .body(body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::Http(e)
          })?;

        let status = response.status();
        trace!("Chat completion response status: {}", status);

        // bytes() consumes the response, so the body is released on every path
        let body = response.bytes().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          Error::ReadBody(e)
        })?;

        if status.as_u16() > 299
        {   if self.config.log_level == ApiLogLevel::Debug
            {   debug!("errorBody: {}", String::from_utf8_lossy(&body));
            }
            let code = status.as_u16();
            let error_response = decode_error(code, &body)?;
            error!(
              "Chat completion API error: {} {}"
            , code, error_response.error.message
            );
            return Err(Error::UnexpectedStatusCode
            {   code
              , message: error_response.error.message
            });
        }

        let completion = decode_completion(&body)?;
        self.log_response(&completion, &body);
        Ok(completion)
    }

    fn log_request(&self, request: &CreateChatCompletion, body: &[u8])
    {   match self.config.log_level
        {   ApiLogLevel::Off => {}
          , ApiLogLevel::Info => {
              info!(
                "model: {}, N: {}, Seed: {}, ResponseFormat: {}"
              , request.model, request.n, request.seed
              , request.response_format
              );
            }
          , ApiLogLevel::Debug => {
              debug!(
                "createChatCompletion: {}"
              , String::from_utf8_lossy(body)
              );
            }
        }
    }

    fn log_response(&self, completion: &ChatCompletion, body: &[u8])
    {   match self.config.log_level
        {   ApiLogLevel::Off => {}
          , ApiLogLevel::Info => {
              info!(
                "ID: {}, Object: {}, Created: {}, model: {}, \
                 SystemFingerprint: {}, ChoicesCount: {}"
              , completion.id, completion.object, completion.created
              , completion.model
              , completion.system_fingerprint.as_deref().unwrap_or("")
              , completion.choices.len()
              );
              if let Some(choice) = completion.first_choice()
              {   info!(
                    "[0]FinishReason: {}, Index: {}"
                  , choice.finish_reason.as_deref().unwrap_or("")
                  , choice.index
                  );
              }
            }
          , ApiLogLevel::Debug => {
              debug!("responseBody: {}", String::from_utf8_lossy(body));
            }
        }
    }
}

#[async_trait]
impl GenerativeClient for ChatClient
{   fn make_chat_completion(&self, prompt: &str) -> CreateChatCompletion
    {   let mut request = CreateChatCompletion::new(
          self.config.model.clone()
        , prompt
        , self.config.max_tokens.filter(|&n| n > 0)
        );
        request.n = self.config.n;
        request.seed = self.config.seed;
        request.response_format = self.config.response_format.clone();
        request
    }

    async fn request_chat_completion(
      &self
    , request: &CreateChatCompletion
    ) -> Result<ChatCompletion>
    {   debug!("Requesting chat completion from {}", self.config.model);
        self.send(request).await
    }
}
