//! Suggestion generator adapters.

mod placeholder;

pub use placeholder::PlaceholderGenerator;
