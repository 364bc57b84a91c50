//! # Logging
//!
//! Console logging bootstrap for binaries and tests that use the client.
//! The library itself only emits `tracing` events and spans; installing a
//! subscriber is left to the application, and [`init_tracing`] is a
//! convenience for doing so.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Output format for console logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Install a global subscriber writing to stdout
///
/// The filter comes from `RUST_LOG` when set, otherwise from `PGMQ_LOG_LEVEL`
/// (default `info`). `PGMQ_LOG_FORMAT=json` switches to JSON lines. Safe to
/// call more than once; an already installed global subscriber is left alone.
pub fn init_tracing() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let format = get_log_format();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level()));

        let layer = match format {
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .boxed(),
        };

        if tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - keeping it");
        }

        tracing::debug!(format = ?format, "pgmq client logging initialized");
    });
}

fn get_log_level() -> String {
    std::env::var("PGMQ_LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

fn get_log_format() -> LogFormat {
    parse_log_format(std::env::var("PGMQ_LOG_FORMAT").ok().as_deref())
}

fn parse_log_format(value: Option<&str>) -> LogFormat {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}
