//! Continuation policy for completions cut off by the length limit

use log::debug;
use crate::config::{ShaperConfig, DEFAULT_CONTINUE_DIRECTIVE};
use crate::request::{
  ChatMessage, Choice, CreateChatCompletion, ROLE_ASSISTANT, ROLE_SYSTEM
};

/// How many requests one shaping call may spend on a truncated answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationPolicy
{   max_attempts: usize
  , continue_directive: String
}

impl ContinuationPolicy
{   pub fn new(
      max_attempts: usize
    , continue_directive: impl Into<String>
    ) -> Self
    {   ContinuationPolicy
        {   max_attempts: max_attempts.max(1)
          , continue_directive: continue_directive.into()
        }
    }

    pub fn from_config(config: &ShaperConfig) -> Self
    {   ContinuationPolicy::new(
          config.max_completion_repeat_count
        , config.continue_directive.clone()
        )
    }

    /// Single request, truncated output returned as is
    pub fn single() -> Self
    {   ContinuationPolicy::new(1, DEFAULT_CONTINUE_DIRECTIVE)
    }

    /// Requests allowed per shaping call, never below 1
    pub fn max_attempts(&self) -> usize
    {   self.max_attempts
    }

    pub fn continue_directive(&self) -> &str
    {   &self.continue_directive
    }

    /// Whether attempt `attempt` (0-based) should be followed by another
    pub fn should_continue(&self, attempt: usize, choice: &Choice) -> bool
    {   let more = attempt + 1 < self.max_attempts;
        debug!(
          "Attempt {} truncated: {}, attempts left: {}"
        , attempt, choice.is_truncated(), more
        );
        choice.is_truncated() && more
    }

    /// Append the partial answer and the continue directive
    pub fn extend(&self, request: &mut CreateChatCompletion, partial: &str)
    {   request.messages.push(ChatMessage::new(ROLE_ASSISTANT, partial));
        request.messages.push(
          ChatMessage::new(ROLE_SYSTEM, self.continue_directive.clone())
        );
    }
}

impl Default for ContinuationPolicy
{   fn default() -> Self
    {   ContinuationPolicy::single()
    }
}
