//! Runtime switches.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeatureFlags {
    /// Hand sessions to Redis queue workers. Off means processing runs inside
    /// the request that created the work.
    #[serde(default)]
    pub enable_async_tasks: bool,

    /// Put the underlying cause in 500 response details. Keep off in production.
    #[serde(default)]
    pub verbose_errors: bool,
}

impl FeatureFlags {
    /// Whether the server should spawn queue workers and dispatch to Redis.
    pub fn uses_queue(&self) -> bool {
        self.enable_async_tasks
    }
}
