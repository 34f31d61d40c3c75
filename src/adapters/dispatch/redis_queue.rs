//! Redis list queue for deferred processing.
//!
//! `RedisQueueDispatcher` LPUSHes JSON-encoded [`SessionJob`]s; each
//! `RedisQueueWorker` BRPOPs them on its own connection and runs the
//! processor. A job is delivered to at most one worker.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `queue_name` | `notification_agent:sessions` | Redis list key |
//! | `poll_timeout` | 5s | BRPOP block time before re-checking shutdown |
//!
//! ## Graceful Shutdown
//!
//! Workers finish the job in hand, then stop when the shutdown channel flips.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{ProcessingOutcome, SessionJob, SessionProcessor, WorkDispatcher};

fn queue_error(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::QueueError, format!("{}: {}", context, e))
}

/// Serialize a job for the wire.
pub fn encode_job(job: &SessionJob) -> Result<String, DomainError> {
    serde_json::to_string(job).map_err(|e| queue_error("Failed to encode job", e))
}

/// Parse a job popped from the queue.
pub fn decode_job(payload: &str) -> Result<SessionJob, DomainError> {
    serde_json::from_str(payload).map_err(|e| queue_error("Malformed job payload", e))
}

/// Deferred dispatcher: enqueue and return.
#[derive(Clone)]
pub struct RedisQueueDispatcher {
    conn: MultiplexedConnection,
    queue_name: String,
}

impl RedisQueueDispatcher {
    pub fn new(conn: MultiplexedConnection, queue_name: impl Into<String>) -> Self {
        Self {
            conn,
            queue_name: queue_name.into(),
        }
    }
}

#[async_trait]
impl WorkDispatcher for RedisQueueDispatcher {
    async fn dispatch(&self, job: SessionJob) -> Result<(), DomainError> {
        let payload = encode_job(&job)?;
        let mut conn = self.conn.clone();

        conn.lpush::<_, _, ()>(&self.queue_name, payload)
            .await
            .map_err(|e: redis::RedisError| queue_error("Failed to enqueue job", e))?;

        debug!(session_id = %job.session_id, queue = %self.queue_name, "job enqueued");
        Ok(())
    }
}

/// Background consumer of the session queue.
pub struct RedisQueueWorker {
    client: redis::Client,
    queue_name: String,
    poll_timeout: Duration,
    processor: Arc<dyn SessionProcessor>,
    worker_id: usize,
}

impl RedisQueueWorker {
    pub fn new(
        client: redis::Client,
        queue_name: impl Into<String>,
        processor: Arc<dyn SessionProcessor>,
    ) -> Self {
        Self {
            client,
            queue_name: queue_name.into(),
            poll_timeout: Duration::from_secs(5),
            processor,
            worker_id: 0,
        }
    }

    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn with_worker_id(mut self, id: usize) -> Self {
        self.worker_id = id;
        self
    }

    /// Run the consume loop until the shutdown signal is received.
    ///
    /// Opens a dedicated connection, since BRPOP blocks it.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DomainError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| queue_error("Failed to connect worker", e))?;

        info!(worker = self.worker_id, queue = %self.queue_name, "queue worker started");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!(worker = self.worker_id, "queue worker stopping");
                        return Ok(());
                    }
                }

                popped = self.pop(&mut conn) => match popped {
                    Ok(Some(payload)) => {
                        self.handle_payload(&payload).await;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(worker = self.worker_id, error = %e, "queue pop failed, backing off");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                },
            }
        }
    }

    async fn pop(&self, conn: &mut MultiplexedConnection) -> Result<Option<String>, DomainError> {
        let popped: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(&self.queue_name)
            .arg(self.poll_timeout.as_secs().max(1))
            .query_async(conn)
            .await
            .map_err(|e| queue_error("BRPOP failed", e))?;

        Ok(popped.map(|(_, payload)| payload))
    }

    /// Decode and process one payload. Malformed payloads are dropped.
    pub async fn handle_payload(&self, payload: &str) -> Option<ProcessingOutcome> {
        let job = match decode_job(payload) {
            Ok(job) => job,
            Err(e) => {
                error!(worker = self.worker_id, error = %e, "dropping malformed job");
                return None;
            }
        };

        let outcome = self.processor.process(job).await;
        info!(
            worker = self.worker_id,
            session_id = %job.session_id,
            outcome = ?outcome,
            "job processed"
        );
        Some(outcome)
    }
}
