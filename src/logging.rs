//! Logger setup for binaries and tests

use log::LevelFilter;
use crate::config::ApiLogLevel;

/// Default filter matching an API log level
pub fn level_filter(level: ApiLogLevel) -> LevelFilter
{   match level
    {   ApiLogLevel::Off => LevelFilter::Warn
      , ApiLogLevel::Info => LevelFilter::Info
      , ApiLogLevel::Debug => LevelFilter::Debug
    }
}

/// Install an env_logger logger; `RUST_LOG` still takes precedence
///
/// Returns false when a logger was already installed.
pub fn init(level: ApiLogLevel) -> bool
{   env_logger::Builder::new()
      .filter_module("textshape", level_filter(level))
      .parse_default_env()
      .try_init()
      .is_ok()
}
