//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionStore` - Tenant-scoped session persistence
//! - `CampaignReader` - Campaign existence/ownership lookups
//! - `WorkDispatcher` - Hands sessions to processing (deferred or inline)
//! - `SessionProcessor` - The processing routine run for each dispatched job
//! - `SuggestionGenerator` - The content-generation pipeline

mod campaign_reader;
mod session_processor;
mod session_store;
mod suggestion_generator;
mod work_dispatcher;

pub use campaign_reader::CampaignReader;
pub use session_processor::{ProcessingOutcome, SessionProcessor};
pub use session_store::SessionStore;
pub use suggestion_generator::SuggestionGenerator;
pub use work_dispatcher::{SessionJob, WorkDispatcher};
