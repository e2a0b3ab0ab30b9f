//! Application state for the web layer.

use std::sync::Arc;

use crate::link::{CachedShortener, HttpShortener};
use crate::selection::SelectionConfig;
use crate::serving::RoundTripIndex;

/// Shared application state.
///
/// Generic over the link shortener so handlers can be exercised without the
/// network.
pub struct AppState<L = CachedShortener<HttpShortener>> {
    /// Round trips being served
    pub index: RoundTripIndex,

    /// Selection engine configuration
    pub selection: Arc<SelectionConfig>,

    /// Link shortener
    pub shortener: Arc<L>,

    /// Booking page for deep links
    pub booking_url: Arc<str>,
}

impl<L> AppState<L> {
    /// Create a new app state.
    pub fn new(
        index: RoundTripIndex,
        selection: SelectionConfig,
        shortener: L,
        booking_url: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            index,
            selection: Arc::new(selection),
            shortener: Arc::new(shortener),
            booking_url: booking_url.into(),
        }
    }
}

impl<L> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            selection: Arc::clone(&self.selection),
            shortener: Arc::clone(&self.shortener),
            booking_url: Arc::clone(&self.booking_url),
        }
    }
}
