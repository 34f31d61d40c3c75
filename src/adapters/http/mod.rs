//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure;
//! `router` assembles them with the shared tower layers.

pub mod health;
pub mod notification_session;
pub mod router;

pub use notification_session::{notification_session_routes, NotificationSessionHandlers};
pub use router::{app_router, RouterOptions, SESSIONS_PATH};
