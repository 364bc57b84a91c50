//! # Connection Provisioning
//!
//! Every client call runs against exactly one [`ProvisionedConnection`]
//! obtained from the client's [`ConnectionSource`]. The source decides whether
//! the connection belongs to the client for the length of the call (and is
//! closed afterwards) or belongs to the caller (and is handed back untouched).
//!
//! Dropping a [`ProvisionedConnection`] always releases it: an owned
//! connection's socket is dropped, a shared connection's lock is released and
//! a pooled connection returns to its pool. [`ProvisionedConnection::release`]
//! additionally performs a graceful close of owned connections.

use sqlx::pool::PoolConnection;
use sqlx::{Connection, PgConnection, PgPool, Postgres};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// A caller-owned connection shared with the client
///
/// The mutex serializes client calls made concurrently against the same
/// connection. Callers can lock it themselves to run their own statements, for
/// example to open a transaction the client's calls then take part in.
pub type SharedConnection = Arc<Mutex<PgConnection>>;

/// Where a client obtains the connection for each call
#[derive(Clone)]
pub enum ConnectionSource {
    /// A connection string. Each call opens a fresh connection and closes it.
    Owned(String),
    /// A caller-supplied connection. Never closed by the client.
    Borrowed(SharedConnection),
    /// A caller-supplied pool. Each call borrows one connection from it.
    Pool(PgPool),
}

impl fmt::Debug for ConnectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // connection strings may carry credentials
        match self {
            Self::Owned(_) => f.write_str("ConnectionSource::Owned(..)"),
            Self::Borrowed(_) => f.write_str("ConnectionSource::Borrowed(..)"),
            Self::Pool(pool) => f
                .debug_tuple("ConnectionSource::Pool")
                .field(&pool.size())
                .finish(),
        }
    }
}

impl ConnectionSource {
    /// Wrap a connection so it can be shared with a client
    pub fn share(connection: PgConnection) -> SharedConnection {
        Arc::new(Mutex::new(connection))
    }

    /// Whether connections from this source are closed by the client
    pub fn is_owning(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Provision a connection for one call
    ///
    /// `connect_timeout` bounds opening a fresh connection only. Waiting for a
    /// shared connection's lock is unbounded, and a pooled connection is
    /// governed by the pool's own `acquire_timeout`. Driver errors are
    /// returned as-is.
    pub async fn acquire(
        &self,
        connect_timeout: Duration,
    ) -> Result<ProvisionedConnection, sqlx::Error> {
        let inner = match self {
            Self::Owned(url) => Inner::Owned(connect(url, connect_timeout).await?),
            Self::Borrowed(shared) => Inner::Borrowed(Arc::clone(shared).lock_owned().await),
            Self::Pool(pool) => Inner::Pooled(pool.acquire().await?),
        };
        Ok(ProvisionedConnection { inner })
    }
}

async fn connect(url: &str, timeout: Duration) -> Result<PgConnection, sqlx::Error> {
    match tokio::time::timeout(timeout, PgConnection::connect(url)).await {
        Ok(result) => result,
        Err(_) => Err(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("timed out opening a connection after {timeout:?}"),
        ))),
    }
}

/// The connection a single call runs on
pub struct ProvisionedConnection {
    inner: Inner,
}

enum Inner {
    Owned(PgConnection),
    Borrowed(OwnedMutexGuard<PgConnection>),
    Pooled(PoolConnection<Postgres>),
}

impl ProvisionedConnection {
    /// Whether this connection is closed on release
    pub fn is_owning(&self) -> bool {
        matches!(self.inner, Inner::Owned(_))
    }

    /// End the call's use of the connection
    ///
    /// Owned connections are closed. Borrowed and pooled connections are left
    /// open for their owner.
    pub async fn release(self) {
        match self.inner {
            Inner::Owned(connection) => {
                if let Err(e) = connection.close().await {
                    debug!(owned = true, error = %e, "Connection close reported an error");
                } else {
                    debug!(owned = true, "Connection closed");
                }
            }
            Inner::Borrowed(_) | Inner::Pooled(_) => {
                debug!(owned = false, "Connection handed back to its owner");
            }
        }
    }
}

impl Deref for ProvisionedConnection {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        match &self.inner {
            Inner::Owned(connection) => connection,
            Inner::Borrowed(guard) => &**guard,
            Inner::Pooled(connection) => &**connection,
        }
    }
}

impl DerefMut for ProvisionedConnection {
    fn deref_mut(&mut self) -> &mut PgConnection {
        match &mut self.inner {
            Inner::Owned(connection) => connection,
            Inner::Borrowed(guard) => &mut **guard,
            Inner::Pooled(connection) => &mut **connection,
        }
    }
}

impl fmt::Debug for ProvisionedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionedConnection")
            .field("owning", &self.is_owning())
            .finish()
    }
}
