use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite;

use crate::errors::CapitalError;
use crate::helpers::{deserialize_or_default, ms_to_utc};
use crate::markets::models::Resolution;

#[derive(Debug)]
pub enum CapitalSocketMessage {
    // == TEXTUAL MESSAGES ==
    // live bid/offer for a subscribed epic
    Quote(QuoteUpdate),
    // candle update from an OHLC subscription
    Ohlc(OhlcUpdate),
    // reply to marketData.subscribe / OHLCMarketData.subscribe
    SubscribedResponse(SubscriptionResponse),
    // reply to marketData.unsubscribe / OHLCMarketData.unsubscribe
    UnsubscribedResponse(SubscriptionResponse),
    // reply to a sent ping
    PingResponse(PingResponse),
    // any message whose status is not OK
    ErrorResponse(ErrorResponse),
    // fallback type in case not able to parse output correctly
    Unparseable(String),
    // == HEARTBEAT TYPES ==
    Ping,
    Pong,
    // == UNEXPECTED TYPES ==
    Binary(tungstenite::Bytes),
    Frame(tungstenite::protocol::frame::Frame),
    Close(Option<tungstenite::protocol::frame::CloseFrame>),
}

impl TryFrom<tungstenite::Message> for CapitalSocketMessage {
    type Error = CapitalError;
    fn try_from(msg: tungstenite::Message) -> Result<CapitalSocketMessage, Self::Error> {
        match msg {
            tungstenite::Message::Text(text) => Ok(Self::from_textual_message(text.to_string())),
            tungstenite::Message::Ping(_) => Ok(Self::Ping),
            tungstenite::Message::Pong(_) => Ok(Self::Pong),
            tungstenite::Message::Binary(b) => Ok(Self::Binary(b)),
            tungstenite::Message::Close(c) => Ok(Self::Close(c)),
            tungstenite::Message::Frame(f) => Ok(Self::Frame(f)),
        }
    }
}

impl CapitalSocketMessage {
    /// Dispatches on the envelope's `destination`. Text that is not a
    /// recognizable envelope comes back verbatim as `Unparseable`.
    pub fn from_textual_message(s: String) -> CapitalSocketMessage {
        let envelope = match serde_json::from_str::<InboundEnvelope>(&s) {
            Ok(envelope) => envelope,
            Err(_) => return CapitalSocketMessage::Unparseable(s),
        };

        if !envelope.status.is_empty() && !envelope.status.eq_ignore_ascii_case("OK") {
            return CapitalSocketMessage::ErrorResponse(ErrorResponse {
                status: envelope.status,
                destination: envelope.destination,
                correlation_id: envelope.correlation_id,
                payload: envelope.payload,
            });
        }

        match envelope.destination.as_str() {
            "quote" => match serde_json::from_value::<QuoteUpdate>(envelope.payload) {
                Ok(quote) => CapitalSocketMessage::Quote(quote),
                Err(_) => CapitalSocketMessage::Unparseable(s),
            },
            "ohlc.event" => match serde_json::from_value::<OhlcUpdate>(envelope.payload) {
                Ok(bar) => CapitalSocketMessage::Ohlc(bar),
                Err(_) => CapitalSocketMessage::Unparseable(s),
            },
            "marketData.subscribe" | "OHLCMarketData.subscribe" => {
                match SubscriptionResponse::from_envelope(envelope) {
                    Some(res) => CapitalSocketMessage::SubscribedResponse(res),
                    None => CapitalSocketMessage::Unparseable(s),
                }
            }
            "marketData.unsubscribe" | "OHLCMarketData.unsubscribe" => {
                match SubscriptionResponse::from_envelope(envelope) {
                    Some(res) => CapitalSocketMessage::UnsubscribedResponse(res),
                    None => CapitalSocketMessage::Unparseable(s),
                }
            }
            "ping" => CapitalSocketMessage::PingResponse(PingResponse {
                status: envelope.status,
                correlation_id: envelope.correlation_id,
            }),
            _ => CapitalSocketMessage::Unparseable(s),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct InboundEnvelope {
    #[serde(deserialize_with = "deserialize_or_default")]
    status: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    destination: String,
    correlation_id: Option<String>,
    payload: serde_json::Value,
}

// Outbound

/// Every outbound message carries the session tokens; the stream has no
/// handshake-level authentication.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage<'a, P: Serialize> {
    pub destination: &'a str,
    pub correlation_id: String,
    pub cst: &'a str,
    pub security_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<P>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MarketDataPayload {
    pub epics: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OhlcPayload {
    pub epics: Vec<String>,
    pub resolutions: Vec<Resolution>,
    /// `classic` or `heikin-ashi`
    #[serde(rename = "type")]
    pub bar_type: String,
}

// Market data stream
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteUpdate {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub epic: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub product: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub bid: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub bid_qty: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub ofr: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub ofr_qty: f64,
    /// Epoch milliseconds
    #[serde(deserialize_with = "deserialize_or_default")]
    pub timestamp: i64,
}

impl QuoteUpdate {
    pub fn spread(&self) -> f64 {
        self.ofr - self.bid
    }

    pub fn mid(&self) -> f64 {
        (self.bid + self.ofr) / 2.0
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        ms_to_utc(self.timestamp)
    }
}

// OHLC stream
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OhlcUpdate {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub epic: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub resolution: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub bar_type: String,
    /// `bid` or `ask`
    #[serde(deserialize_with = "deserialize_or_default")]
    pub price_type: String,
    /// Bar open time, epoch milliseconds
    #[serde(deserialize_with = "deserialize_or_default")]
    pub t: i64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub o: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub h: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub l: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub c: f64,
}

impl OhlcUpdate {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        ms_to_utc(self.t)
    }
}

// Responses to sent messages
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionResponse {
    pub destination: String,
    pub status: String,
    pub correlation_id: Option<String>,
    /// epic -> `PROCESSED` or an error description
    pub subscriptions: BTreeMap<String, String>,
}

impl SubscriptionResponse {
    fn from_envelope(envelope: InboundEnvelope) -> Option<SubscriptionResponse> {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Payload {
            subscriptions: BTreeMap<String, String>,
        }

        let payload = match envelope.payload {
            serde_json::Value::Null => Payload::default(),
            value => serde_json::from_value::<Payload>(value).ok()?,
        };
        Some(SubscriptionResponse {
            destination: envelope.destination,
            status: envelope.status,
            correlation_id: envelope.correlation_id,
            subscriptions: payload.subscriptions,
        })
    }

    /// Epics the server did not accept
    pub fn rejected(&self) -> Vec<&str> {
        self.subscriptions
            .iter()
            .filter(|(_, state)| state.as_str() != "PROCESSED")
            .map(|(epic, _)| epic.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PingResponse {
    pub status: String,
    pub correlation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub status: String,
    pub destination: String,
    pub correlation_id: Option<String>,
    pub payload: serde_json::Value,
}
