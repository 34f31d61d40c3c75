//! Typed settings read from the environment.
//!
//! Keys are `NOTIFICATION_AGENT__<SECTION>__<KEY>`, for example
//! `NOTIFICATION_AGENT__QUEUE__WORKERS=8`. A `.env` file is read first when
//! present. `main` loads one [`AppConfig`], validates it, and hands pieces to
//! the components that need them.

mod database;
mod dispatch;
mod error;
mod features;
mod queue;
mod server;

pub use database::DatabaseConfig;
pub use dispatch::DispatchConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use queue::QueueConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "NOTIFICATION_AGENT";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// The only section without defaults; `database.url` must be set.
    pub database: DatabaseConfig,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub features: FeatureFlags,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl AppConfig {
    /// Read `.env` (if any) and the process environment.
    ///
    /// Scalars are parsed from strings, so `...__PORT=3000` becomes a `u16`.
    ///
    /// # Errors
    ///
    /// `LoadError` when `database.url` is missing or a value has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Check every section, then the rules that span sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.queue.validate()?;
        self.dispatch.validate()?;
        if self.features.enable_async_tasks {
            if self.queue.url.is_none() {
                return Err(ValidationError::AsyncTasksWithoutQueue);
            }
            self.database.ensure_capacity_for(self.queue.workers)?;
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
