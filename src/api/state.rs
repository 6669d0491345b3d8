//! Application state for the locum calculation API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, LocationDataProvider};

/// Shared application state.
///
/// Holds the location data provider every handler calculates against. The
/// provider is read-only, so one instance serves all requests.
#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn LocationDataProvider>,
}

impl AppState {
    /// Creates application state backed by loaded tax tables.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_provider(Arc::new(config))
    }

    /// Creates application state backed by any location data provider.
    pub fn with_provider(provider: Arc<dyn LocationDataProvider>) -> Self {
        Self { provider }
    }

    /// Returns the location data provider.
    pub fn provider(&self) -> &dyn LocationDataProvider {
        self.provider.as_ref()
    }
}
