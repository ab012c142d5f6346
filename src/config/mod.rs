//! Runtime settings for the worker host, the built-in handlers and logging
//!
//! Later layers override earlier ones:
//! 1. struct defaults
//! 2. the TOML file at `$CARWASH_CONFIG`, else `config/carwash.toml` (optional)
//! 3. a `.env` file in the working directory, read into the environment
//! 4. `CARWASH__<SECTION>__<KEY>` environment variables
//!
//! Durations take `"250ms"`, `"2s"`, `"1m"` or a bare millisecond count, e.g.
//! `CARWASH__HANDLERS__WASH_DELAY=2s` or `CARWASH__WORKER__JOB_INTERVAL=500`.
//! The merged result is checked by [`ValidationError`] rules before use.
//!
//! ```no_run
//! use carwash::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Jobs every {}", config.worker.job_interval);
//! ```

mod models;
mod sources;
mod validation;

pub use crate::humanize::HumanDuration;
pub use models::{Config, HandlerSettings, TelemetryConfig, WorkerConfig};
pub use validation::ValidationError;

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Merge every layer listed in the module docs, then validate
    ///
    /// # Errors
    ///
    /// `LoadError` for unreadable TOML or a value of the wrong shape (an
    /// unparseable or out-of-range duration included), `ValidationError`
    /// for values outside the accepted limits.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Like [`Config::load`] with an explicit file and no `.env` lookup
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path.as_ref())?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
