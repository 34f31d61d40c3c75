//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `notification` - Notification session aggregate and lifecycle rules
//! - `campaign` - Read-only campaign reference entity

pub mod campaign;
pub mod foundation;
pub mod notification;
