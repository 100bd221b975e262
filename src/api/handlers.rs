//! Request handlers for the gateway endpoints

use axum::{
    extract::{FromRequestParts, Query, State},
    http::{header::CONTENT_TYPE, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::upstream::{RefDataPayload, RefDataRequest};
use crate::AppState;

/// Liveness greeting
#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: String,
}

/// Query string accepted by the specialties endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SpecialtiesQuery {
    pub profession: Option<String>,
}

/// `Query` extractor whose rejections use the gateway's error body
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

impl IntoResponse for RefDataPayload {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, "application/json")], self.into_bytes()).into_response()
    }
}

async fn relay(state: &AppState, request: RefDataRequest) -> Result<RefDataPayload> {
    let source = state.refdata.name();
    let resource = request.resource;
    debug!(source = %source, resource = %resource, "Relaying reference data");

    state.refdata.fetch(request).await.map_err(|e| {
        warn!(
            source = %source,
            resource = %resource,
            status = e.status_code().as_u16(),
            error = %e,
            "Reference data lookup failed"
        );
        e
    })
}

/// GET /api/v1/hello
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello, world!".to_string(),
    })
}

/// GET /api/countries
pub async fn countries(State(state): State<Arc<AppState>>) -> Result<RefDataPayload> {
    relay(&state, RefDataRequest::countries()).await
}

/// GET /api/professions
pub async fn professions(State(state): State<Arc<AppState>>) -> Result<RefDataPayload> {
    relay(&state, RefDataRequest::professions()).await
}

/// GET /api/specialties?profession=<id>
pub async fn specialties(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SpecialtiesQuery>,
) -> Result<RefDataPayload> {
    relay(&state, RefDataRequest::specialties(query.profession)).await
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Fallback for known routes hit with an unsupported method
pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(format!("{} {}", method, uri.path()))
}
