//! Test database utilities for pgmq client integration tests

#![allow(dead_code)]

use pgmq_client::{Pgmq, PgmqConfig};
use sqlx::{Connection, PgConnection};
use uuid::Uuid;

/// Connection string for the test database, if one is configured
///
/// Prefers PGMQ_DATABASE_URL, falling back to DATABASE_URL.
pub fn database_url() -> Option<String> {
    std::env::var("PGMQ_DATABASE_URL")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .filter(|s| !s.is_empty())
}

/// Test database handle with a connection-per-call client and unique queue names
pub struct TestDb {
    pub database_url: String,
    pub client: Pgmq,
    pub test_id: String,
    pub created_queues: Vec<String>,
}

impl TestDb {
    /// Connect to the test database, or `None` when no database is configured
    pub async fn new() -> Option<Self> {
        let Some(database_url) = database_url() else {
            println!("Skipping pgmq integration test - no DATABASE_URL provided");
            return None;
        };

        let config = PgmqConfig::default().with_database_url(database_url.clone());
        let client = Pgmq::from_config(config).expect("Failed to build pgmq client");

        // concurrent tests may race on CREATE EXTENSION; one of them wins
        let _ = client.init_extension().await;
        client
            .get_extension_version()
            .await
            .expect("Failed to query pgmq version")
            .expect("pgmq extension should be installed");

        let test_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        Some(Self {
            database_url,
            client,
            test_id,
            created_queues: Vec::new(),
        })
    }

    /// Unique queue name for this test, without creating the queue
    pub fn queue_name(&self, base: &str) -> String {
        format!("{}_{}", base, self.test_id)
    }

    /// Create a queue with a unique name
    pub async fn create_test_queue(&mut self, base: &str) -> String {
        let queue_name = self.queue_name(base);
        self.client
            .create_queue(&queue_name)
            .await
            .expect("Failed to create test queue");
        self.created_queues.push(queue_name.clone());
        queue_name
    }

    /// Open a separate connection for direct verification queries
    pub async fn connect(&self) -> PgConnection {
        PgConnection::connect(&self.database_url)
            .await
            .expect("Failed to open verification connection")
    }

    /// Rows in the queue's live table
    pub async fn queue_row_count(&self, queue_name: &str) -> i64 {
        self.count_rows(&format!("pgmq.q_{queue_name}")).await
    }

    /// Rows in the queue's archive table
    pub async fn archive_row_count(&self, queue_name: &str) -> i64 {
        self.count_rows(&format!("pgmq.a_{queue_name}")).await
    }

    /// How many times a message id appears in the queue's live table
    pub async fn occurrences(&self, queue_name: &str, msg_id: i64) -> i64 {
        let mut connection = self.connect().await;
        let query = format!("SELECT COUNT(*) FROM pgmq.q_{queue_name} WHERE msg_id = $1");
        let count: i64 = sqlx::query_scalar(&query)
            .bind(msg_id)
            .fetch_one(&mut connection)
            .await
            .expect("Failed to count message occurrences");
        count
    }

    async fn count_rows(&self, table_name: &str) -> i64 {
        let mut connection = self.connect().await;
        let query = format!("SELECT COUNT(*) FROM {table_name}");
        let count: i64 = sqlx::query_scalar(&query)
            .fetch_one(&mut connection)
            .await
            .expect("Failed to count rows");
        count
    }

    /// Drop every queue this test created
    pub async fn cleanup(self) {
        for queue in &self.created_queues {
            let _ = self.client.drop_queue(queue).await;
        }
    }
}

/// Helper to create test JSON messages
pub fn create_test_message(msg_type: &str, data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "type": msg_type,
        "data": data,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "test_id": Uuid::new_v4().to_string()
    })
}
