//! Generative client capability the shaper is written against

use async_trait::async_trait;
use crate::error::Result;
use crate::request::{ChatCompletion, CreateChatCompletion};

/// Something that can build and send chat completion requests
#[async_trait]
pub trait GenerativeClient: Send + Sync
{   /// Build a fresh request for a single prompt
    fn make_chat_completion(&self, prompt: &str) -> CreateChatCompletion;

    /// Send a request and return the parsed completion
    async fn request_chat_completion(
      &self
    , request: &CreateChatCompletion
    ) -> Result<ChatCompletion>;
}

#[async_trait]
impl<C> GenerativeClient for std::sync::Arc<C>
where
  C: GenerativeClient + ?Sized
{   fn make_chat_completion(&self, prompt: &str) -> CreateChatCompletion
    {   (**self).make_chat_completion(prompt)
    }

    async fn request_chat_completion(
      &self
    , request: &CreateChatCompletion
    ) -> Result<ChatCompletion>
    {   (**self).request_chat_completion(request).await
    }
}
