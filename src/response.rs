//! Response post-processing
//!
//! Code blocks are found with a regular expression, not a markdown parser.
//! Nested fences, or fences inside a code block, will confuse it.

use regex::Regex;
use log::trace;
use crate::error::{Error, Result};

const FENCE: &str = "```";

const CODE_BLOCK_PATTERN: &str = r"(?s)```[a-zA-Z0-9]*?\n(.*?\n)```";

/// Strip an enclosing code fence and optionally keep only the first code block
pub fn optimize_response(raw: &str, use_first_code_block: bool) -> Result<String>
{   let mut result = strip_enclosing_fence(raw);

    if use_first_code_block
    {   if let Some(block) = find_first_code_block(&result)?
        {   trace!("Using first code block ({} bytes)", block.len());
            result = block;
        }
    }
    Ok(result)
}

/// Drop the first and last line when the whole text is one fenced block
pub fn strip_enclosing_fence(raw: &str) -> String
{   if raw.starts_with(FENCE) && raw.ends_with(FENCE)
    {   let lines: Vec<&str> = raw.split('\n').collect();
        if lines.len() > 2
        {   return lines[1..lines.len() - 1].join("\n");
        }
    }
    raw.to_string()
}

/// Interior of the first fenced code block, if there is one
///
/// The line break right before the closing fence is dropped; blank lines
/// inside the block are kept.
pub fn find_first_code_block(text: &str) -> Result<Option<String>>
{   let re = Regex::new(CODE_BLOCK_PATTERN).map_err(Error::CodeBlockPattern)?;
    Ok(re.captures(text)
      .and_then(|caps| caps.get(1))
      .map(|m| {
        let interior = m.as_str();
        interior.strip_suffix('\n').unwrap_or(interior).to_string()
      }))
}
