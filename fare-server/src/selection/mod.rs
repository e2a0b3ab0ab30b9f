//! Query/selection engine.
//!
//! Given a fully resolved [`QueryConstraint`], [`Selector::select`] filters
//! the round-trip index and applies one of the selection policies:
//! - further results: paginated, cheapest first, without the overall cheapest
//! - price ceiling: the nearest trip under it, else the cheapest with a note
//! - month or date with nothing found: explain whether it is beyond the window
//! - otherwise the cheapest matching trip

mod config;
mod constraint;
mod message;
mod select;

pub use config::SelectionConfig;
pub use constraint::{Period, QueryConstraint};
pub use message::SelectionMessage;
pub use select::{Selection, Selector, paging_order};
