//! Common traits and types for reference-data sources

use async_trait::async_trait;
use axum::body::Bytes;
use std::fmt;

use crate::error::{AppError, Result};

/// Reference-data collection exposed by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Countries,
    Professions,
    Specialties,
}

impl Resource {
    /// Path segment of the collection below the upstream base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Countries => "countries",
            Resource::Professions => "professions",
            Resource::Specialties => "specialties",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A single upstream lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefDataRequest {
    pub resource: Resource,

    /// Sent upstream as `professionId`; only specialties lookups carry one
    pub profession_id: Option<String>,
}

impl RefDataRequest {
    pub fn countries() -> Self {
        Self {
            resource: Resource::Countries,
            profession_id: None,
        }
    }

    pub fn professions() -> Self {
        Self {
            resource: Resource::Professions,
            profession_id: None,
        }
    }

    /// Specialties lookup, optionally narrowed to one profession.
    /// An empty profession counts as absent.
    pub fn specialties(profession: Option<String>) -> Self {
        Self {
            resource: Resource::Specialties,
            profession_id: profession.filter(|p| !p.is_empty()),
        }
    }
}

/// Opaque JSON body returned by the upstream, kept as the original bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefDataPayload {
    body: Bytes,
}

impl RefDataPayload {
    /// Wrap an upstream body, rejecting anything that is not a JSON document.
    /// The document is only checked, never rebuilt.
    pub fn from_json_bytes(body: Bytes) -> Result<Self> {
        serde_json::from_slice::<serde::de::IgnoredAny>(&body)
            .map_err(|e| AppError::InvalidPayload(e.to_string()))?;
        Ok(Self { body })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Trait for reference-data sources
#[async_trait]
pub trait RefDataSource: Send + Sync {
    /// Get the source name, used in logs
    fn name(&self) -> &str;

    /// Fetch one collection and return its body untouched
    async fn fetch(&self, request: RefDataRequest) -> Result<RefDataPayload>;
}
