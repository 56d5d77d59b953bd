use std::collections::BTreeMap;

use axum::http::Method;
use capital_rs::account::models::UpdatePreferencesRequest;
use serde_json::json;

use crate::common::*;


#[tokio::test]
async fn test_get_accounts() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::GET,
        "/accounts",
        200,
        json!({"accounts": [{
            "accountId": "acc-1", "accountName": "Main", "status": "ENABLED",
            "accountType": "CFD", "preferred": true, "currency": "USD", "symbol": "$",
            "balance": {"balance": 1000.0, "deposit": 1000.0, "profitLoss": 12.5, "available": 900.0}
        }]}),
    );

    let response = client.get_accounts().await.unwrap();
    let account = &response.accounts[0];
    assert_eq!(account.account_id, "acc-1");
    assert!(account.preferred);
    assert_eq!(account.balance.profit_loss, 12.5);
    assert_eq!(account.to_string(), "account acc-1 (Main) USD");
}

#[tokio::test]
async fn test_get_preferences() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::GET,
        "/accounts/preferences",
        200,
        json!({"hedgingMode": false, "leverages": {
            "SHARES": {"current": 5, "available": [1, 2, 5]},
            "CURRENCIES": {"current": 30, "available": [10, 20, 30]}
        }}),
    );

    let prefs = client.get_preferences().await.unwrap();
    assert!(!prefs.hedging_mode);
    assert_eq!(prefs.leverages["SHARES"].current, 5);
    assert_eq!(prefs.leverages["CURRENCIES"].available, vec![10, 20, 30]);
}

#[tokio::test]
async fn test_set_hedging_mode_sends_only_that_field() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(Method::PUT, "/accounts/preferences", 200, json!({"status": "SUCCESS"}));

    let response = client.set_hedging_mode(true).await.unwrap();
    assert_eq!(response.status, "SUCCESS");

    let request = server.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/accounts/preferences");
    assert_eq!(request.json(), json!({"hedgingMode": true}));
}

#[tokio::test]
async fn test_update_leverages() {
    let (server, client, _clock) = setup_logged_in().await;

    let mut leverages = BTreeMap::new();
    leverages.insert("SHARES".to_string(), 2);
    client.update_leverages(leverages).await.unwrap();

    assert_eq!(server.last_request().json(), json!({"leverages": {"SHARES": 2}}));
}

#[tokio::test]
async fn test_update_preferences_empty_body() {
    let (server, client, _clock) = setup_logged_in().await;

    client
        .update_preferences(&UpdatePreferencesRequest::default())
        .await
        .unwrap();
    assert_eq!(server.last_request().json(), json!({}));
}
