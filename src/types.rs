//! # Types for the PGMQ client
//!
//! Row projections returned by the PGMQ extension functions and the small value
//! types used to parameterize calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PgmqError;

/// Sentinel reported for metrics columns the connected server does not provide
pub const METRIC_NOT_AVAILABLE: i64 = -1;

/// A message read from a queue
///
/// `message` is `None` when the stored payload is SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<T = serde_json::Value> {
    pub msg_id: i64,
    pub read_ct: i32,
    pub enqueued_at: DateTime<Utc>,
    pub vt: DateTime<Utc>,
    pub message: Option<T>,
}

/// An entry of the queue registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueInfo {
    pub queue_name: String,
    pub created_at: DateTime<Utc>,
    pub is_partitioned: bool,
    pub is_unlogged: bool,
}

/// Point-in-time metrics for a single queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMetrics {
    /// Name of the queue
    pub queue_name: String,
    /// Messages currently stored in the queue, visible or not
    pub queue_length: i64,
    /// Age of the newest message in seconds, `None` when the queue is empty
    pub newest_msg_age_sec: Option<i32>,
    /// Age of the oldest message in seconds, `None` when the queue is empty
    pub oldest_msg_age_sec: Option<i32>,
    /// Messages ever sent to the queue
    pub total_messages: i64,
    /// When the server computed these numbers
    pub scrape_time: DateTime<Utc>,
    /// Messages currently visible, or [`METRIC_NOT_AVAILABLE`] before pgmq 1.5.0
    pub queue_visible_length: i64,
}

impl QueueMetrics {
    /// Whether the server reported a visible-message count
    pub fn has_visible_length(&self) -> bool {
        self.queue_visible_length != METRIC_NOT_AVAILABLE
    }
}

/// When a sent message becomes visible to readers
///
/// Relative and absolute delays are mutually exclusive, so they share one
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendDelay {
    /// Visible immediately
    #[default]
    Immediate,
    /// Visible after the given number of seconds
    Seconds(i32),
    /// Visible at the given instant (pgmq 1.5.0 and later)
    Until(DateTime<Utc>),
}

impl From<i32> for SendDelay {
    fn from(seconds: i32) -> Self {
        Self::Seconds(seconds)
    }
}

impl From<DateTime<Utc>> for SendDelay {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Until(at)
    }
}

/// Installed version of the pgmq extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExtensionVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ExtensionVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// `queue_visible_length` was added to the metrics functions in 1.5.0
    pub fn supports_visible_length(&self) -> bool {
        *self >= Self::new(1, 5, 0)
    }

    /// `pgmq.send` accepts a `timestamptz` delay from 1.5.0
    pub fn supports_timestamp_delay(&self) -> bool {
        *self >= Self::new(1, 5, 0)
    }
}

impl fmt::Display for ExtensionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ExtensionVersion {
    type Err = PgmqError;

    /// Parses `major[.minor[.patch]]`, ignoring any `-pre` or `+build` suffix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let core = s
            .trim()
            .split(['-', '+'])
            .next()
            .unwrap_or_default();

        let mut parts = [0u64; 3];
        for (index, part) in core.split('.').enumerate() {
            if index >= parts.len() {
                return Err(PgmqError::unexpected_result(format!(
                    "extension version '{s}' has more than three components"
                )));
            }
            parts[index] = part.parse().map_err(|_| {
                PgmqError::unexpected_result(format!("extension version '{s}' is not numeric"))
            })?;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}
