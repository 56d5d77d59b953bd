use axum::http::Method;
use capital_rs::ErrorKind;
use serde_json::json;

use crate::common::*;


#[tokio::test]
async fn test_rate_limit_with_vendor_body() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::GET,
        "/markets",
        429,
        json!({"errorCode": "RATE_LIMIT_EXCEEDED", "message": "Too many requests"}),
    );

    let err = client.search_markets(Some("gold"), None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimit);
    assert!(err.is_rate_limit_error());
    assert_eq!(err.status(), Some(429));
    assert_eq!(err.error_code(), Some("RATE_LIMIT_EXCEEDED"));
    assert_eq!(err.message(), "Too many requests");
    assert_eq!(err.full_message(), "[RATE_LIMIT_EXCEEDED] Too many requests");
}

#[tokio::test]
async fn test_bad_request_with_unparseable_body() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond_raw(Method::POST, "/positions", 400, "<html>bad</html>");

    let order = capital_rs::trading::models::OpenPositionRequest::new(
        "GOLD",
        capital_rs::trading::models::Direction::Buy,
        1.0,
    );
    let err = client.open_position(&order).await.unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.error_code(), None);
    assert_eq!(err.message(), "Bad Request - Invalid parameters");
}

#[tokio::test]
async fn test_vendor_body_without_message() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::GET,
        "/positions",
        404,
        json!({"errorCode": "error.not-found.dealId"}),
    );

    let err = client.get_positions().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert_eq!(err.message(), "API Error");
    assert_eq!(err.error_code(), Some("error.not-found.dealId"));
}

#[tokio::test]
async fn test_forbidden_is_authentication_error() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond_raw(Method::GET, "/accounts", 403, "");

    let err = client.get_accounts().await.unwrap_err();
    assert!(err.is_authentication_error());
    assert_eq!(err.message(), "Forbidden - Access denied");
}

#[tokio::test]
async fn test_server_error_uses_status_message() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond_raw(Method::GET, "/watchlists", 503, "");

    let err = client.get_watchlists().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.message(), "Service Unavailable");
}

#[tokio::test]
async fn test_invalid_json_on_success_is_parse_error() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond_raw(Method::GET, "/accounts", 200, "not json");

    let err = client.get_accounts().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(err.message().starts_with("Parse error"));
    assert!(err.message().contains("not json"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let config = capital_rs::Configuration::new(API_KEY, true).with_base_url("http://127.0.0.1:1");
    let client = capital_rs::CapitalClient::new(config).unwrap();

    let err = client.login(IDENTIFIER, PASSWORD, false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Generic);
    assert!(err.message().starts_with("HTTP request failed"));
    assert!(std::error::Error::source(&err).is_some());
}
