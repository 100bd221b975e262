//! HTTP client for the upstream reference-data API

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::{AppError, Result};
use crate::upstream::traits::{RefDataPayload, RefDataRequest, RefDataSource, Resource};

/// Longest upstream error body echoed back in an error message
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Reference-data source backed by the upstream REST API
pub struct HttpRefDataSource {
    name: String,
    client: Client,
    base_url: String,
}

impl HttpRefDataSource {
    /// Create a new HTTP source from configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: "refdata".to_string(),
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full upstream URL of a collection, without query string
    pub fn url_for(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }
}

/// Map a transport failure onto the gateway's error taxonomy
fn classify(resource: Resource, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout(format!("{} request to upstream timed out", resource))
    } else if err.is_connect() || err.is_request() {
        AppError::UpstreamUnavailable(format!("{}: {}", resource, err))
    } else {
        AppError::HttpClient(err)
    }
}

#[async_trait]
impl RefDataSource for HttpRefDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, request: RefDataRequest) -> Result<RefDataPayload> {
        let resource = request.resource;
        let url = self.url_for(resource);

        let mut builder = self.client.get(&url);
        if let Some(profession_id) = &request.profession_id {
            builder = builder.query(&[("professionId", profession_id.as_str())]);
        }

        debug!(
            source = %self.name,
            url = %url,
            profession_id = ?request.profession_id,
            "Sending upstream request"
        );

        let response = builder.send().await.map_err(|e| {
            debug!(source = %self.name, url = %url, error = %e, "Upstream request failed");
            classify(resource, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(
                        source = %self.name,
                        url = %url,
                        status = status.as_u16(),
                        error = %e,
                        "Failed to read upstream error body"
                    );
                    String::new()
                }
            };
            let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            debug!(
                source = %self.name,
                url = %url,
                status = status.as_u16(),
                "Upstream returned an error status"
            );
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify(resource, e))?;

        let payload = RefDataPayload::from_json_bytes(body).map_err(|e| {
            debug!(source = %self.name, url = %url, error = %e, "Upstream payload is not JSON");
            e
        })?;

        debug!(
            source = %self.name,
            resource = %resource,
            bytes = payload.len(),
            "Upstream request completed"
        );

        Ok(payload)
    }
}
