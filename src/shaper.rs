//! Shaping pipeline: prompt optimization, completion, response cleanup

use std::future::Future;
use log::{debug, info, trace};
use crate::client::GenerativeClient;
use crate::config::ShaperConfig;
use crate::continuation::ContinuationPolicy;
use crate::error::{Error, Result};
use crate::prompt::optimize_prompt;
use crate::response::optimize_response;

/// Outcome of one shaping call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeResult
{   prompt: String
  , raw_result: String
  , result: String
}

impl ShapeResult
{   /// Build a result, making sure `result` ends with a line break
    pub fn new(
      prompt: impl Into<String>
    , raw_result: impl Into<String>
    , result: impl Into<String>
    ) -> Self
    {   ShapeResult
        {   prompt: prompt.into()
          , raw_result: raw_result.into()
          , result: ensure_trailing_newline(result.into())
        }
    }

    /// Prompt actually sent to the model
    pub fn prompt(&self) -> &str
    {   &self.prompt
    }

    /// Completion text as received
    pub fn raw_result(&self) -> &str
    {   &self.raw_result
    }

    /// Final text, always ending with a line break
    pub fn result(&self) -> &str
    {   &self.result
    }
}

/// Append one `\n` unless the text already ends with one
pub fn ensure_trailing_newline(mut text: String) -> String
{   if !text.ends_with('\n')
    {   text.push('\n');
    }
    text
}

/// Which path a shaping call takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMode
{   /// Raw prompt in, raw completion out
    Direct
  , /// Wrapped prompt, post-processed completion
    Optimized
}

/// Turns instructions plus input into shaped text
pub struct Shaper<C>
{   client: C
  , policy: ContinuationPolicy
  , use_first_code_block: bool
  , prompt_optimize: bool
}

impl<C: GenerativeClient> Shaper<C>
{   pub fn new(client: C, config: &ShaperConfig) -> Self
    {   debug!("Creating Shaper with {:?}", config);
        Shaper
        {   client
          , policy: ContinuationPolicy::from_config(config)
          , use_first_code_block: config.use_first_code_block
          , prompt_optimize: config.prompt_optimize
        }
    }

    pub fn client(&self) -> &C
    {   &self.client
    }

    pub fn policy(&self) -> &ContinuationPolicy
    {   &self.policy
    }

    pub fn mode_for(&self, input: &str) -> ShapeMode
    {   if input.is_empty() && !self.prompt_optimize
        {   ShapeMode::Direct
        } else
        {   ShapeMode::Optimized
        }
    }

    /// Run one shaping call
    pub async fn shape_text(
      &self
    , prompt: &str
    , input: &str
    ) -> Result<ShapeResult>
    {   match self.mode_for(input)
        {   ShapeMode::Direct => {
              debug!("Shaping in direct mode");
              let raw_result = self.request_completion(prompt).await?;
              Ok(ShapeResult::new(prompt, raw_result.clone(), raw_result))
            }
          , ShapeMode::Optimized => {
              debug!("Shaping in optimized mode");
              let optimized = optimize_prompt(prompt, input);
              trace!("Optimized prompt: {}", optimized);
              let raw_result = self.request_completion(&optimized).await?;
              let result = optimize_response(
                &raw_result
              , self.use_first_code_block
              )?;
              Ok(ShapeResult::new(optimized, raw_result, result))
            }
        }
    }

    /// Like `shape_text`, but gives up when `cancel` resolves
    pub async fn shape_text_until<F>(
      &self
    , prompt: &str
    , input: &str
    , cancel: F
    ) -> Result<ShapeResult>
    where
      F: Future<Output = ()>
    {   tokio::select!
        { biased;
          _ = cancel => {
            info!("Shaping cancelled");
            Err(Error::Cancelled)
          }
        , result = self.shape_text(prompt, input) => result
        }
    }

    /// Request a completion, following truncated answers up to the policy bound
    ///
    /// An answer without choices ends the loop with whatever text has
    /// accumulated so far, possibly none.
    pub async fn request_completion(&self, prompt: &str) -> Result<String>
    {   let mut request = self.client.make_chat_completion(prompt);
        let mut result = String::new();

        for attempt in 0..self.policy.max_attempts()
        {   let completion = self.client
              .request_chat_completion(&request)
              .await
              .map_err(|e| Error::Completion(Box::new(e)))?;

            // only the first choice is used
            let Some(choice) = completion.first_choice() else
            {   debug!("Completion {} has no choices", completion.id);
                break;
            };
            result.push_str(&choice.message.content);

            if !self.policy.should_continue(attempt, choice)
            {   break;
            }
            info!("Completion truncated, asking for continuation");
            self.policy.extend(&mut request, &choice.message.content);
        }

        Ok(result)
    }
}
