//! Configuration module for http_env.
//!
//! Centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use http_env::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Charset: {}", config.response.charset);
//! ```

mod error;
mod logging;
mod parse;
mod response;

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use response::{ResponseConfig, Timezone};

/// Complete crate configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Response pipeline configuration.
    pub response: ResponseConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            response: ResponseConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Timezone offset: {}s", self.response.timezone.offset_secs());
        info!("  Charset: {}", self.response.charset);
        info!("  Language: {}", self.response.language);
        info!("  Content type: {}", self.response.content_type);
        info!("  Cache max-age: {}s", self.response.cache_max_age);
        info!("  Log filter: {}", self.logging.filter);
    }
}
