use capital_rs::websocket::models::*;
use tokio_tungstenite::tungstenite::{Bytes, Message};


#[test]
fn test_quote_message() {
    let text = r#"{"status":"OK","destination":"quote","payload":{"epic":"OIL_CRUDE","product":"CFD","bid":93.87,"bidQty":4976.0,"ofr":93.9,"ofrQty":5000.0,"timestamp":1660297198421}}"#;
    match CapitalSocketMessage::from_textual_message(text.to_string()) {
        CapitalSocketMessage::Quote(quote) => {
            assert_eq!(quote.epic, "OIL_CRUDE");
            assert_eq!(quote.bid_qty, 4976.0);
            assert!((quote.mid() - 93.885).abs() < 1e-9);
            assert!(quote.time().is_some());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_quote_with_null_sizes_still_dispatches() {
    let text = r#"{"status":null,"destination":"quote","payload":{"epic":"GOLD","bid":2050.1,"bidQty":null,"ofr":2050.5,"ofrQty":null,"product":null}}"#;
    match CapitalSocketMessage::from_textual_message(text.to_string()) {
        CapitalSocketMessage::Quote(quote) => {
            assert_eq!(quote.epic, "GOLD");
            assert_eq!(quote.bid_qty, 0.0);
            assert_eq!(quote.product, "");
            assert!((quote.spread() - 0.4).abs() < 1e-9);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_ohlc_message() {
    let text = r#"{"status":"OK","destination":"ohlc.event","payload":{"resolution":"MINUTE","epic":"OIL_CRUDE","type":"classic","priceType":"bid","t":1671714360000,"h":79.08,"l":79.06,"o":79.07,"c":79.08}}"#;
    match CapitalSocketMessage::from_textual_message(text.to_string()) {
        CapitalSocketMessage::Ohlc(bar) => {
            assert_eq!(bar.bar_type, "classic");
            assert_eq!(bar.price_type, "bid");
            assert_eq!(bar.h, 79.08);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_subscription_confirmation_with_rejected_epic() {
    let text = r#"{"status":"OK","destination":"marketData.subscribe","correlationId":"1","payload":{"subscriptions":{"GOLD":"PROCESSED","NOPE":"ERROR: invalid.epic"}}}"#;
    match CapitalSocketMessage::from_textual_message(text.to_string()) {
        CapitalSocketMessage::SubscribedResponse(res) => {
            assert_eq!(res.destination, "marketData.subscribe");
            assert_eq!(res.rejected(), vec!["NOPE"]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_unsubscribe_confirmation() {
    let text = r#"{"status":"OK","destination":"OHLCMarketData.unsubscribe","correlationId":"4","payload":{"subscriptions":{"GOLD":"PROCESSED"}}}"#;
    assert!(matches!(
        CapitalSocketMessage::from_textual_message(text.to_string()),
        CapitalSocketMessage::UnsubscribedResponse(_)
    ));
}

#[test]
fn test_non_ok_status_is_error_response() {
    let text = r#"{"status":"FAILED","destination":"marketData.subscribe","correlationId":"2","payload":{"errorCode":"error.invalid.session.token"}}"#;
    match CapitalSocketMessage::from_textual_message(text.to_string()) {
        CapitalSocketMessage::ErrorResponse(err) => {
            assert_eq!(err.status, "FAILED");
            assert_eq!(err.payload["errorCode"], "error.invalid.session.token");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_unknown_text_is_kept_verbatim() {
    for text in ["not json at all", r#"{"destination":"something.new","payload":{}}"#, "[1,2,3]"] {
        match CapitalSocketMessage::from_textual_message(text.to_string()) {
            CapitalSocketMessage::Unparseable(raw) => assert_eq!(raw, text),
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn test_quote_with_wrong_payload_is_unparseable() {
    let text = r#"{"status":"OK","destination":"quote","payload":{"bid":"high"}}"#;
    assert!(matches!(
        CapitalSocketMessage::from_textual_message(text.to_string()),
        CapitalSocketMessage::Unparseable(_)
    ));
}

#[test]
fn test_control_frames() {
    assert!(matches!(
        CapitalSocketMessage::try_from(Message::Ping(Bytes::new())).unwrap(),
        CapitalSocketMessage::Ping
    ));
    assert!(matches!(
        CapitalSocketMessage::try_from(Message::Pong(Bytes::new())).unwrap(),
        CapitalSocketMessage::Pong
    ));
    assert!(matches!(
        CapitalSocketMessage::try_from(Message::Close(None)).unwrap(),
        CapitalSocketMessage::Close(None)
    ));
}
