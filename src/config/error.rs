//! Errors raised while loading or checking configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value that the service refuses to start with.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingRequired(&'static str),

    #[error("server.port must be non-zero")]
    InvalidPort,

    #[error("server.host must be an IP address")]
    InvalidHost,

    #[error("server.request_timeout_secs is out of range")]
    InvalidTimeout,

    #[error("database.url must use the postgres:// or postgresql:// scheme")]
    InvalidDatabaseUrl,

    #[error("queue.url must use the redis:// or rediss:// scheme")]
    InvalidQueueUrl,

    #[error("database.min_connections must not exceed a non-zero database.max_connections")]
    InvalidPoolSize,

    #[error("database.max_connections exceeds 100")]
    PoolSizeTooLarge,

    #[error("database.max_connections must exceed queue.workers")]
    PoolTooSmallForWorkers,

    #[error("queue.workers must be between 1 and 64")]
    InvalidWorkerCount,

    #[error("dispatch.processing_timeout_secs must be positive")]
    InvalidProcessingTimeout,

    #[error("features.enable_async_tasks requires queue.url")]
    AsyncTasksWithoutQueue,
}
