//! Upstream module - Reference-data source trait and HTTP client

pub mod http_source;
pub mod traits;

pub use http_source::HttpRefDataSource;
pub use traits::{RefDataPayload, RefDataRequest, RefDataSource, Resource};
