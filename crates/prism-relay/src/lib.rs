//! Multi-model generation relay
//!
//! Accepts one image + one prompt + a set of target model identifiers,
//! validates them against a fixed allow-list, dispatches one upstream
//! `generateContent` call per model concurrently, and aggregates partial
//! successes and failures into a single response.

mod error;
mod handler;
pub mod models;
pub mod protocol;
mod state;

pub use error::RelayError;
pub use handler::relay_router;
pub use state::{AggregateOutcome, RelayState};
