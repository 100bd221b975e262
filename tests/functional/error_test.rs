//! Functional tests for upstream failures and unknown routes

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
};
use serde_json::Value;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::{create_test_app, get, send};

fn error_body(body: &[u8]) -> Value {
    let body: Value = serde_json::from_slice(body).unwrap();
    assert!(body["error"]["message"].is_string());
    body
}

#[tokio::test]
async fn test_upstream_not_found_is_relayed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such collection"))
        .mount(&server)
        .await;
    let app = create_test_app(&server.uri(), 1000);

    let (status, headers, body) = get(app, "/api/countries").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    let body = error_body(&body);
    assert_eq!(body["error"]["type"], "upstream_error");
    assert_eq!(body["error"]["code"], "upstream_status");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("no such collection"));
}

#[tokio::test]
async fn test_upstream_server_error_is_relayed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/professions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let app = create_test_app(&server.uri(), 1000);

    let (status, _, body) = get(app, "/api/professions").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_body(&body)["error"]["type"], "upstream_error");
}

#[tokio::test]
async fn test_upstream_timeout_returns_gateway_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/specialties"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("[]", "application/json")
                .set_delay(Duration::from_millis(1000)),
        )
        .mount(&server)
        .await;
    let app = create_test_app(&server.uri(), 100);

    let (status, _, body) = get(app, "/api/specialties").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    let body = error_body(&body);
    assert_eq!(body["error"]["type"], "timeout_error");
    assert_eq!(body["error"]["code"], "upstream_timeout");
}

#[tokio::test]
async fn test_non_json_upstream_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>maintenance</html>", "text/html"))
        .mount(&server)
        .await;
    let app = create_test_app(&server.uri(), 1000);

    let (status, _, body) = get(app, "/api/countries").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        error_body(&body)["error"]["code"],
        "invalid_upstream_payload"
    );
}

#[tokio::test]
async fn test_unreachable_upstream_returns_structured_error() {
    // Nothing listens on port 1
    let app = create_test_app("http://127.0.0.1:1", 1000);

    let (status, headers, body) = get(app, "/api/countries").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    let body = error_body(&body);
    assert_eq!(body["error"]["type"], "upstream_error");
    assert_eq!(body["error"]["code"], "upstream_unavailable");
}

#[tokio::test]
async fn test_unknown_route_returns_not_found() {
    let app = create_test_app("http://127.0.0.1:1", 1000);

    let (status, _, body) = get(app, "/api/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let body = error_body(&body);
    assert_eq!(body["error"]["type"], "not_found_error");
    assert_eq!(body["error"]["code"], "route_not_found");
}

#[tokio::test]
async fn test_repeated_profession_returns_structured_bad_request() {
    let server = MockServer::start().await;
    let app = create_test_app(&server.uri(), 1000);

    let (status, headers, body) = get(app, "/api/specialties?profession=1&profession=2").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    let body = error_body(&body);
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert_eq!(body["error"]["code"], "invalid_query");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("profession"));

    // Rejected before any upstream call
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unsupported_method_returns_structured_method_not_allowed() {
    let app = create_test_app("http://127.0.0.1:1", 1000);

    let (status, headers, body) = send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/api/countries")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    let body = error_body(&body);
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert_eq!(body["error"]["code"], "method_not_allowed");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("POST /api/countries"));
}
