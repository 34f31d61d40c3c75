//! Composition root.
//!
//! Wires stores, dispatcher and handlers into the HTTP router. `main` picks
//! the concrete adapters; tests pass in-memory ones.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use crate::adapters::http::{app_router, NotificationSessionHandlers, RouterOptions};
use crate::application::handlers::{
    CreateSessionHandler, GetSessionHandler, ProcessSessionHandler, ReviewSessionHandler,
    SessionLifecycle,
};
use crate::ports::{CampaignReader, SessionStore, SuggestionGenerator, WorkDispatcher};

/// Build the session processor shared by both dispatch strategies.
pub fn session_processor(
    store: Arc<dyn SessionStore>,
    generator: Arc<dyn SuggestionGenerator>,
    processing_timeout: Duration,
) -> Arc<ProcessSessionHandler> {
    Arc::new(
        ProcessSessionHandler::new(SessionLifecycle::new(store), generator)
            .with_timeout(processing_timeout),
    )
}

/// Everything the HTTP layer needs.
pub struct AppComponents {
    pub store: Arc<dyn SessionStore>,
    pub campaigns: Arc<dyn CampaignReader>,
    pub dispatcher: Arc<dyn WorkDispatcher>,
    pub verbose_errors: bool,
}

impl AppComponents {
    /// Build the full application router.
    pub fn into_router(self, options: &RouterOptions) -> Router {
        let lifecycle = SessionLifecycle::new(self.store);

        let handlers = NotificationSessionHandlers::new(
            Arc::new(CreateSessionHandler::new(
                self.campaigns,
                lifecycle.clone(),
                self.dispatcher.clone(),
            )),
            Arc::new(GetSessionHandler::new(lifecycle.clone())),
            Arc::new(ReviewSessionHandler::new(lifecycle, self.dispatcher)),
        )
        .with_verbose_errors(self.verbose_errors);

        app_router(handlers, options)
    }
}
