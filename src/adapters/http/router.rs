//! Top-level router: API routes plus the cross-cutting tower layers.

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::health::health_routes;
use super::notification_session::{notification_session_routes, NotificationSessionHandlers};

/// Mount point of the session API.
pub const SESSIONS_PATH: &str = "/api/v1/notification-sessions";

/// Router settings taken from the server config.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
    pub is_production: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
            is_production: false,
        }
    }
}

/// Build the application router.
pub fn app_router(handlers: NotificationSessionHandlers, options: &RouterOptions) -> Router {
    Router::new()
        .merge(health_routes())
        .nest(SESSIONS_PATH, notification_session_routes(handlers))
        .layer(cors_layer(options))
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(options: &RouterOptions) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    let explicit: Vec<HeaderValue> = options
        .cors_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if explicit.is_empty() || options.cors_origins.iter().any(|o| o == "*") {
        if options.is_production {
            warn!("CORS allows any origin in production");
        }
        return base.allow_origin(Any);
    }

    base.allow_origin(AllowOrigin::list(explicit))
}
