#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # pgmq-client
//!
//! Typed async client for [PGMQ](https://github.com/pgmq/pgmq), the message
//! queue implemented as a PostgreSQL extension.
//!
//! All queue semantics (visibility timeouts, atomic dequeue, archiving,
//! partitioning) live in the extension. This crate opens or borrows a
//! connection for each call, encodes payloads to JSON, calls the extension's
//! SQL functions with bound parameters and maps the rows back into typed
//! values.
//!
//! ## Connection modes
//!
//! - **Connection string**: [`Pgmq::new`] opens a fresh connection for every
//!   call and closes it afterwards.
//! - **Shared connection**: [`Pgmq::new_with_connection`] runs every call on a
//!   caller-owned [`SharedConnection`], which is never closed by the client and
//!   can carry the caller's transaction.
//! - **Pool**: [`Pgmq::new_with_pool`] borrows one connection from a
//!   caller-owned `sqlx::PgPool` per call.
//!
//! ## Payloads
//!
//! Any `serde` type can be sent and read. `String` payloads are special: they
//! are sent verbatim as JSON text and read back without parsing. See
//! [`codec`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pgmq_client::{Pgmq, PgmqConfig};
//!
//! let pgmq = Pgmq::from_config(PgmqConfig::load()?)?;
//! pgmq.init_extension().await?;
//! pgmq.create_queue("orders").await?;
//!
//! pgmq.send("orders", &serde_json::json!({"order_id": 7})).await?;
//! if let Some(message) = pgmq.poll::<serde_json::Value>("orders").await? {
//!     pgmq.archive("orders", message.msg_id).await?;
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`client`] - Queue operations
//! - [`connection`] - Per-call connection provisioning
//! - [`codec`] - Payload JSON encoding
//! - [`types`] - Messages, queue info, metrics and versions
//! - [`config`] - Client defaults and configuration loading
//! - [`error`] - Structured error handling
//! - [`logging`] - Console logging bootstrap

pub mod client;
pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod types;

pub use client::Pgmq;
pub use config::PgmqConfig;
pub use connection::{ConnectionSource, SharedConnection};
pub use error::{PgmqError, Result};
pub use logging::init_tracing;
pub use types::{
    ExtensionVersion, Message, QueueInfo, QueueMetrics, SendDelay, METRIC_NOT_AVAILABLE,
};
