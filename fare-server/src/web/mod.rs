//! Web layer for the fare aggregator.
//!
//! Provides JSON endpoints for the conversational front-end: round-trip
//! selection, booking links, and service status.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
