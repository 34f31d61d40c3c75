//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Session and campaign persistence
//! - `dispatch` - Inline and Redis-queue work dispatch
//! - `generation` - Suggestion generators
//! - `http` - axum REST API
//! - `memory` - In-memory stores for tests and local runs

pub mod dispatch;
pub mod generation;
pub mod http;
pub mod memory;
pub mod postgres;

pub use dispatch::{InlineDispatcher, RedisQueueDispatcher, RedisQueueWorker};
pub use generation::PlaceholderGenerator;
pub use memory::{InMemoryCampaignReader, InMemorySessionStore};
pub use postgres::{PostgresCampaignReader, PostgresSessionStore};
