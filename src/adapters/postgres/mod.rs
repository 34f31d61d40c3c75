//! PostgreSQL adapters - Database implementations for store ports.
//!
//! - `PostgresSessionStore` - Notification session persistence
//! - `PostgresCampaignReader` - Tenant-scoped campaign lookups

mod campaign_reader;
mod session_store;

pub use campaign_reader::PostgresCampaignReader;
pub use session_store::PostgresSessionStore;
