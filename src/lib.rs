//! Notification Agent - notification session service
//!
//! Companies start notification-generation sessions for a campaign; each
//! session is processed (inline or on queue workers) into suggestions that an
//! admin reviews, selects from, and gives feedback on.
//!
//! Layout follows hexagonal architecture: `domain` holds the aggregate and its
//! state machine, `ports` the traits, `adapters` the Postgres/Redis/axum
//! implementations, `application` the lifecycle engine and handlers.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
