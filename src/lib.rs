//! Reference-Data Gateway
//!
//! A small HTTP gateway that relays country, profession and specialty
//! reference data from an upstream REST API, unchanged, to browser clients.

pub mod api;
pub mod config;
pub mod error;
pub mod upstream;

pub use error::{AppError, Result};

use std::sync::Arc;

use upstream::{HttpRefDataSource, RefDataSource};

/// Application state shared across all handlers
pub struct AppState {
    pub refdata: Arc<dyn RefDataSource>,
}

impl AppState {
    /// Build state backed by the configured upstream API
    pub fn new(settings: &config::Settings) -> Result<Self> {
        let source = HttpRefDataSource::new(&settings.upstream)?;
        Ok(Self::with_source(Arc::new(source)))
    }

    /// Build state around an arbitrary reference-data source
    pub fn with_source(refdata: Arc<dyn RefDataSource>) -> Self {
        Self { refdata }
    }
}
