//! Runs a list of shaping jobs with per-job callbacks

use log::{debug, info, warn};
use crate::client::GenerativeClient;
use crate::error::{Error, Result};
use crate::shaper::{ShapeResult, Shaper};

/// One prompt/input pair to shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeJob
{   /// Name reported to callbacks and errors (file path, "-" for stdin)
    pub label: String
  , pub prompt: String
  , pub input: String
}

impl ShapeJob
{   pub fn new(
      label: impl Into<String>
    , prompt: impl Into<String>
    , input: impl Into<String>
    ) -> Self
    {   ShapeJob
        {   label: label.into()
          , prompt: prompt.into()
          , input: input.into()
        }
    }
}

/// Shapes jobs one after another
pub struct Runner<'a, C>
{   shaper: &'a Shaper<C>
}

impl<'a, C: GenerativeClient> Runner<'a, C>
{   pub fn new(shaper: &'a Shaper<C>) -> Self
    {   Runner { shaper }
    }

    /// Shape every job in order
    ///
    /// `on_after` gets `None` for skipped jobs. The first failure stops the
    /// run; jobs already finished keep their results.
    pub async fn run<B, A>(
      &self
    , jobs: &[ShapeJob]
    , mut on_before: B
    , mut on_after: A
    ) -> Result<Vec<ShapeResult>>
    where
      B: FnMut(&str)
    , A: FnMut(&str, Option<&ShapeResult>)
    {   info!("Running {} shaping jobs", jobs.len());
        let mut results = Vec::with_capacity(jobs.len());

        for job in jobs
        {   if job.prompt.is_empty()
            {   warn!("Skipping {}: empty prompt", job.label);
                on_after(&job.label, None);
                continue;
            }

            debug!("Shaping {}", job.label);
            on_before(&job.label);
            let shaped = self.shaper
              .shape_text(&job.prompt, &job.input)
              .await
              .map_err(|e| Error::Job
              {   label: job.label.clone()
                , source: Box::new(e)
              })?;
            on_after(&job.label, Some(&shaped));
            results.push(shaped);
        }
        Ok(results)
    }
}
