use axum::http::Method;
use capital_rs::watchlists::models::UpdateWatchlistRequest;
use serde_json::json;

use crate::common::*;


#[tokio::test]
async fn test_get_watchlists() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::GET,
        "/watchlists",
        200,
        json!({"watchlists": [
            {"id": "wl-1", "name": "Metals", "editable": true, "deleteable": true,
             "defaultSystemWatchlist": false}
        ]}),
    );

    let response = client.get_watchlists().await.unwrap();
    assert_eq!(response.watchlists.len(), 1);
    assert_eq!(response.watchlists[0].to_string(), "watchlist wl-1 (Metals)");
}

#[tokio::test]
async fn test_get_watchlist_markets() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::GET,
        "/watchlists/wl-1",
        200,
        json!({"markets": [{"epic": "GOLD"}, {"epic": "SILVER"}]}),
    );

    let watchlist = client.get_watchlist("wl-1").await.unwrap();
    let epics: Vec<&str> = watchlist.markets.iter().map(|m| m.epic.as_str()).collect();
    assert_eq!(epics, vec!["GOLD", "SILVER"]);
}

#[tokio::test]
async fn test_create_watchlist() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::POST,
        "/watchlists",
        200,
        json!({"watchlistId": "wl-9", "status": "SUCCESS"}),
    );

    let created = client.create_watchlist("Metals", &["GOLD", "SILVER"]).await.unwrap();
    assert_eq!(created.watchlist_id, "wl-9");
    assert_eq!(
        server.last_request().json(),
        json!({"name": "Metals", "epics": ["GOLD", "SILVER"]})
    );
}

#[tokio::test]
async fn test_update_and_delete_watchlist() {
    let (server, client, _clock) = setup_logged_in().await;

    let update = UpdateWatchlistRequest {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    client.update_watchlist("wl-1", &update).await.unwrap();
    let request = server.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/watchlists/wl-1");
    assert_eq!(request.json(), json!({"name": "Renamed"}));

    client.delete_watchlist("wl-1").await.unwrap();
    let request = server.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/watchlists/wl-1");
    assert!(request.body.is_empty());
}

#[tokio::test]
async fn test_add_and_remove_instrument() {
    let (server, client, _clock) = setup_logged_in().await;

    client.add_instrument("wl-1", "GOLD").await.unwrap();
    let request = server.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/watchlists/wl-1/GOLD");

    client.remove_instrument("wl-1", "GOLD").await.unwrap();
    let request = server.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/watchlists/wl-1/GOLD");
}

#[tokio::test]
async fn test_instrument_path_segments_are_encoded() {
    let (server, client, _clock) = setup_logged_in().await;

    client.add_instrument("my list", "A/B").await.unwrap();
    assert_eq!(server.last_request().path, "/watchlists/my%20list/A%2FB");

    client.delete_watchlist("wl#1").await.unwrap();
    assert_eq!(server.last_request().path, "/watchlists/wl%231");
}
