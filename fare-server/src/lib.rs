//! Round-trip fare aggregator.
//!
//! Collects high-speed fares between Moscow and Saint Petersburg for the
//! whole booking window, indexes them into cheapest round trips, and answers
//! "what is the cheapest way there and back?" under the constraints a
//! front-end passes in.

pub mod collector;
pub mod config;
pub mod domain;
pub mod filter;
pub mod indexer;
pub mod link;
pub mod selection;
pub mod serving;
pub mod store;
pub mod upstream;
pub mod web;
