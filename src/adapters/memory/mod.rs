//! In-memory adapters for tests and local development.

mod campaign_reader;
mod session_store;

pub use campaign_reader::InMemoryCampaignReader;
pub use session_store::InMemorySessionStore;
