use axum::http::Method;
use capital_rs::trading::models::*;
use serde_json::json;

use crate::common::*;


/// POSITIONS TESTS
#[tokio::test]
async fn test_get_positions() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::GET,
        "/positions",
        200,
        json!({"positions": [{
            "position": {"dealId": "d-1", "direction": "BUY", "size": 1.0, "level": 2050.0,
                         "currency": "USD", "upl": 12.3, "createdDate": "2024-01-01T10:00:00"},
            "market": {"epic": "GOLD", "instrumentName": "Gold", "bid": 2062.0, "offer": 2062.4}
        }]}),
    );

    let response = client.get_positions().await.unwrap();
    let entry = &response.positions[0];
    assert_eq!(entry.position.deal_id, "d-1");
    assert_eq!(entry.position.profit, 12.3);
    assert!(entry.position.is_long());
    assert!(entry.position.is_profitable());
    assert_eq!(entry.market.epic, "GOLD");
}

#[tokio::test]
async fn test_get_position() {
    let (server, client, _clock) = setup_logged_in().await;

    client.get_position("d-1").await.unwrap();
    assert_eq!(server.last_request().path, "/positions/d-1");
}

#[tokio::test]
async fn test_deal_ids_are_encoded_as_one_segment() {
    let (server, client, _clock) = setup_logged_in().await;

    client.get_position("d/1?x").await.unwrap();
    let request = server.last_request();
    assert_eq!(request.path, "/positions/d%2F1%3Fx");
    assert_eq!(request.query, None);

    client.cancel_working_order("w 1").await.unwrap();
    assert_eq!(server.last_request().path, "/workingorders/w%201");
}

#[tokio::test]
async fn test_open_position_applies_defaults() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(Method::POST, "/positions", 200, json!({"dealReference": "o_123"}));

    let order = OpenPositionRequest::new("GOLD", Direction::Buy, 1.5);
    let deal = client.open_position(&order).await.unwrap();
    assert_eq!(deal.deal_reference, "o_123");

    assert_eq!(
        server.last_request().json(),
        json!({
            "epic": "GOLD",
            "direction": "BUY",
            "size": 1.5,
            "orderType": "MARKET",
            "timeInForce": "FILL_OR_KILL",
            "guaranteedStop": false
        })
    );
}

#[tokio::test]
async fn test_open_position_with_levels() {
    let (server, client, _clock) = setup_logged_in().await;

    let direction: Direction = "sell".parse().unwrap();
    let order = OpenPositionRequest::new("EURUSD", direction, 1000.0)
        .stop_level(1.1)
        .limit_level(1.05)
        .guaranteed_stop(true);
    client.open_position(&order).await.unwrap();

    let body = server.last_request().json();
    assert_eq!(body["direction"], "SELL");
    assert_eq!(body["stopLevel"], 1.1);
    assert_eq!(body["limitLevel"], 1.05);
    assert_eq!(body["guaranteedStop"], true);
    assert!(body.get("level").is_none());
}

#[tokio::test]
async fn test_update_position() {
    let (server, client, _clock) = setup_logged_in().await;

    let update = UpdatePositionRequest {
        stop_level: Some(2000.0),
        ..Default::default()
    };
    client.update_position("d-1", &update).await.unwrap();

    let request = server.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/positions/d-1");
    assert_eq!(request.json(), json!({"stopLevel": 2000.0}));
}

#[tokio::test]
async fn test_close_position_sends_body_with_delete() {
    let (server, client, _clock) = setup_logged_in().await;

    client.close_position("d-1", Direction::Sell, Some(0.5)).await.unwrap();
    let request = server.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/positions/d-1");
    assert_eq!(request.json(), json!({"direction": "SELL", "size": 0.5}));

    client.close_position("d-2", Direction::Buy, None).await.unwrap();
    assert_eq!(server.last_request().json(), json!({"direction": "BUY"}));
}


/// WORKING ORDERS TESTS
#[tokio::test]
async fn test_get_working_orders() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::GET,
        "/workingorders",
        200,
        json!({"workingOrders": [{
            "workingOrderData": {"dealId": "w-1", "epic": "GOLD", "direction": "SELL",
                                 "orderSize": 2.0, "orderLevel": 2100.0, "orderType": "LIMIT",
                                 "timeInForce": "GOOD_TILL_CANCELLED"},
            "marketData": {"epic": "GOLD"}
        }]}),
    );

    let response = client.get_working_orders().await.unwrap();
    let order = &response.working_orders[0].working_order_data;
    assert_eq!(order.size, 2.0);
    assert_eq!(order.level, 2100.0);
    assert!(order.is_sell_order());
    assert!(order.is_limit_order());
    assert!(order.is_good_till_cancelled());
}

#[tokio::test]
async fn test_create_working_order_applies_defaults() {
    let (server, client, _clock) = setup_logged_in().await;

    let order = CreateWorkingOrderRequest::new("GOLD", Direction::Buy, 1.0, 2000.0);
    client.create_working_order(&order).await.unwrap();

    assert_eq!(
        server.last_request().json(),
        json!({
            "epic": "GOLD",
            "direction": "BUY",
            "size": 1.0,
            "level": 2000.0,
            "type": "LIMIT",
            "timeInForce": "GOOD_TILL_CANCELLED",
            "guaranteedStop": false
        })
    );
}

#[tokio::test]
async fn test_create_stop_order_good_till_date() {
    let (server, client, _clock) = setup_logged_in().await;

    let order = CreateWorkingOrderRequest::new("GOLD", Direction::Sell, 1.0, 1950.0)
        .order_type(OrderType::Stop)
        .good_till_date("2024-02-01T00:00:00");
    client.create_working_order(&order).await.unwrap();

    let body = server.last_request().json();
    assert_eq!(body["type"], "STOP");
    assert_eq!(body["timeInForce"], "GOOD_TILL_DATE");
    assert_eq!(body["goodTillDate"], "2024-02-01T00:00:00");
}

#[tokio::test]
async fn test_update_get_and_cancel_working_order() {
    let (server, client, _clock) = setup_logged_in().await;

    let update = UpdateWorkingOrderRequest {
        level: Some(2010.0),
        ..Default::default()
    };
    client.update_working_order("w-1", &update).await.unwrap();
    let request = server.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/workingorders/w-1");
    assert_eq!(request.json(), json!({"level": 2010.0}));

    client.get_working_order("w-1").await.unwrap();
    assert_eq!(server.last_request().method, Method::GET);

    client.cancel_working_order("w-1").await.unwrap();
    let request = server.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/workingorders/w-1");
}


/// CONFIRMATION AND HISTORY TESTS
#[tokio::test]
async fn test_get_deal_confirmation() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::GET,
        "/confirms/o_123",
        200,
        json!({"dealReference": "o_123", "dealStatus": "ACCEPTED", "status": "OPEN",
               "dealId": "d-1", "affectedDeals": [{"dealId": "d-1", "status": "OPENED"}]}),
    );

    let confirmation = client.get_deal_confirmation("o_123").await.unwrap();
    assert!(confirmation.is_accepted());
    assert_eq!(confirmation.affected_deals[0].status, "OPENED");
}

#[tokio::test]
async fn test_activity_history_always_sends_detailed() {
    let (server, client, _clock) = setup_logged_in().await;

    client
        .get_activity_history(&ActivityHistoryQuery::default())
        .await
        .unwrap();
    assert_eq!(server.last_request().query.as_deref(), Some("detailed=false"));

    let query = ActivityHistoryQuery {
        last_period: Some(3600),
        detailed: true,
        deal_id: Some("d-1".to_string()),
        ..Default::default()
    };
    client.get_activity_history(&query).await.unwrap();
    let request = server.last_request();
    assert_eq!(request.path, "/history/activity");
    assert_eq!(
        request.query.as_deref(),
        Some("lastPeriod=3600&detailed=true&dealId=d-1")
    );
}

#[tokio::test]
async fn test_transaction_history() {
    let (server, client, _clock) = setup_logged_in().await;
    server.respond(
        Method::GET,
        "/history/transactions",
        200,
        json!({"transactions": [{"date": "2024-01-01T10:00:00", "instrumentName": "Gold",
                                 "transactionType": "TRADE", "size": "-2.43",
                                 "currency": "USD", "status": "PROCESSED"}]}),
    );

    let query = TransactionHistoryQuery {
        type_: Some("TRADE".to_string()),
        ..Default::default()
    };
    let history = client.get_transaction_history(&query).await.unwrap();
    assert_eq!(server.last_request().query.as_deref(), Some("type=TRADE"));
    assert_eq!(history.transactions[0].size, "-2.43");
}
