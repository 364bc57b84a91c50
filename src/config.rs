//! # Client Configuration
//!
//! Defaults applied by the short forms of the client operations, plus the
//! connection string used by [`crate::Pgmq::from_config`].
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. `config/pgmq.{toml,yaml,json,...}` relative to the working directory
//! 3. the file named by `PGMQ_CONFIG_FILE`, which must exist when set
//! 4. `PGMQ__*` environment variables, e.g. `PGMQ__POLL_TIMEOUT_SECONDS=10`

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{PgmqError, Result};

/// Environment variable naming an explicit configuration file
pub const CONFIG_FILE_ENV: &str = "PGMQ_CONFIG_FILE";

/// Configuration for [`crate::Pgmq`]
///
/// # Examples
///
/// ```rust
/// use pgmq_client::PgmqConfig;
///
/// let config = PgmqConfig::default();
/// assert_eq!(config.visibility_timeout_seconds, 30);
/// assert_eq!(config.read_batch_limit, 10);
/// assert_eq!(config.poll_timeout_seconds, 5);
/// assert_eq!(config.poll_interval_ms, 250);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PgmqConfig {
    /// Connection string for connection-per-call clients
    pub database_url: Option<String>,

    /// Visibility timeout applied by `read`, `read_batch`, `poll` and `poll_batch`
    pub visibility_timeout_seconds: i32,

    /// Message limit applied by `read_batch` and `poll_batch`
    pub read_batch_limit: i32,

    /// How long the server waits for a message when polling
    pub poll_timeout_seconds: i32,

    /// How often the server re-checks the queue while polling
    pub poll_interval_ms: i32,

    /// Upper bound on opening a fresh connection for a connection-per-call client
    pub connect_timeout_seconds: u64,
}

impl Default for PgmqConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            visibility_timeout_seconds: 30,
            read_batch_limit: 10,
            poll_timeout_seconds: 5,
            poll_interval_ms: 250,
            connect_timeout_seconds: 10,
        }
    }
}

impl std::fmt::Debug for PgmqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgmqConfig")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("visibility_timeout_seconds", &self.visibility_timeout_seconds)
            .field("read_batch_limit", &self.read_batch_limit)
            .field("poll_timeout_seconds", &self.poll_timeout_seconds)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .finish()
    }
}

impl PgmqConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the standard sources
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/pgmq").required(false));

        if let Ok(explicit_path) = std::env::var(CONFIG_FILE_ENV) {
            if !explicit_path.is_empty() {
                info!(path = %explicit_path, "Loading pgmq configuration from explicit path");
                builder = builder.add_source(config::File::with_name(&explicit_path).required(true));
            }
        }

        let config = builder
            .add_source(config::Environment::with_prefix("PGMQ").separator("__"))
            .build()
            .map_err(|e| PgmqError::configuration(format!("failed to build configuration: {e}")))?;

        Self::finish(config)
    }

    /// Load configuration from a single file, ignoring the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .build()
            .map_err(|e| {
                PgmqError::configuration(format!(
                    "failed to read configuration file {}: {e}",
                    path.display()
                ))
            })?;

        Self::finish(config)
    }

    fn finish(config: config::Config) -> Result<Self> {
        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| PgmqError::configuration(format!("invalid configuration: {e}")))?;
        loaded.validate()?;
        debug!(config = ?loaded, "pgmq configuration loaded");
        Ok(loaded)
    }

    /// Set the connection string
    pub fn with_database_url<S: Into<String>>(mut self, url: S) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Set the default visibility timeout
    pub fn with_visibility_timeout_seconds(mut self, seconds: i32) -> Self {
        self.visibility_timeout_seconds = seconds;
        self
    }

    /// Set the default batch limit
    pub fn with_read_batch_limit(mut self, limit: i32) -> Self {
        self.read_batch_limit = limit;
        self
    }

    /// Set the default poll timeout and interval
    pub fn with_poll(mut self, timeout_seconds: i32, interval_ms: i32) -> Self {
        self.poll_timeout_seconds = timeout_seconds;
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Set the timeout for opening a fresh connection
    pub fn with_connect_timeout_seconds(mut self, seconds: u64) -> Self {
        self.connect_timeout_seconds = seconds;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.database_url {
            if url.trim().is_empty() {
                return Err(PgmqError::configuration("database_url must not be empty"));
            }
        }
        if self.visibility_timeout_seconds < 0 {
            return Err(PgmqError::configuration(
                "visibility_timeout_seconds must not be negative",
            ));
        }
        if self.read_batch_limit <= 0 {
            return Err(PgmqError::configuration("read_batch_limit must be positive"));
        }
        if self.poll_timeout_seconds <= 0 {
            return Err(PgmqError::configuration(
                "poll_timeout_seconds must be positive",
            ));
        }
        if self.poll_interval_ms <= 0 {
            return Err(PgmqError::configuration("poll_interval_ms must be positive"));
        }
        if self.connect_timeout_seconds == 0 {
            return Err(PgmqError::configuration(
                "connect_timeout_seconds must be positive",
            ));
        }
        Ok(())
    }
}
