//! Markets module models.
//!
//! Market listings, market details, historical prices, navigation and
//! client sentiment. All response fields fall back to zero/empty when the
//! API leaves them out.

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::helpers::{deserialize_or_default, ms_to_utc};


/// Price resolution for historical prices and OHLC streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum Resolution {
    #[serde(rename = "MINUTE")]
    #[display("MINUTE")]
    Minute,
    #[serde(rename = "MINUTE_5")]
    #[display("MINUTE_5")]
    Minute5,
    #[serde(rename = "MINUTE_15")]
    #[display("MINUTE_15")]
    Minute15,
    #[serde(rename = "MINUTE_30")]
    #[display("MINUTE_30")]
    Minute30,
    #[serde(rename = "HOUR")]
    #[display("HOUR")]
    Hour,
    #[serde(rename = "HOUR_4")]
    #[display("HOUR_4")]
    Hour4,
    #[default]
    #[serde(rename = "DAY")]
    #[display("DAY")]
    Day,
    #[serde(rename = "WEEK")]
    #[display("WEEK")]
    Week,
}


/// Server time in epoch milliseconds.
///
/// **Endpoint:** `GET /time`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerTime {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub server_time: i64,
}

impl ServerTime {
    pub fn as_utc(&self) -> Option<DateTime<Utc>> {
        ms_to_utc(self.server_time)
    }
}


/// Query for `GET /markets`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    /// Comma separated epics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epics: Option<String>,
}


/// Market summary as returned by searches and embedded in other responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Display)]
#[display("{epic} ({instrument_name}) bid {bid} offer {offer}")]
#[serde(rename_all = "camelCase", default)]
pub struct Market {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub epic: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub symbol: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub instrument_name: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub instrument_type: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub market_status: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub bid: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub offer: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub net_change: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub percentage_change: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub high: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub low: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub update_time: String,
    #[serde(rename = "updateTimeUTC")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub update_time_utc: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub delay_time: i64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub streaming_prices_available: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub scaling_factor: f64,
}

impl Market {
    pub fn spread(&self) -> f64 {
        self.offer - self.bid
    }

    pub fn mid_price(&self) -> f64 {
        (self.bid + self.offer) / 2.0
    }

    pub fn is_trading(&self) -> bool {
        self.market_status.eq_ignore_ascii_case("TRADEABLE")
    }

    pub fn is_rising(&self) -> bool {
        self.net_change > 0.0
    }
}


/// **Endpoint:** `GET /markets`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetMarketsResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub markets: Vec<Market>,
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instrument {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub epic: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub symbol: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub expiry: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub lot_size: f64,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub type_: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub guaranteed_stop_allowed: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub streaming_prices_available: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub market_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub currency: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub margin_factor: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub margin_factor_unit: String,
}


/// A dealing rule value with its unit (`POINTS` or `PERCENTAGE`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleValue {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub unit: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub value: f64,
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DealingRules {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub min_step_distance: RuleValue,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub min_deal_size: RuleValue,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub max_deal_size: RuleValue,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub min_size_increment: RuleValue,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub min_guaranteed_stop_distance: RuleValue,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub min_stop_or_profit_distance: RuleValue,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub max_stop_or_profit_distance: RuleValue,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub market_order_preference: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub trailing_stops_preference: String,
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketSnapshot {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub market_status: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub net_change: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub percentage_change: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub update_time: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub delay_time: i64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub bid: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub offer: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub high: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub low: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub decimal_places_factor: u32,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub scaling_factor: f64,
}

impl MarketSnapshot {
    pub fn spread(&self) -> f64 {
        self.offer - self.bid
    }

    pub fn is_trading(&self) -> bool {
        self.market_status.eq_ignore_ascii_case("TRADEABLE")
    }
}


/// **Endpoint:** `GET /markets/{epic}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketDetails {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub instrument: Instrument,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub dealing_rules: DealingRules,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub snapshot: MarketSnapshot,
}


/// Query for `GET /prices/{epic}`. Resolution defaults to `DAY`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PricesQuery {
    pub resolution: Resolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    /// ISO 8601 start, e.g. `2024-01-01T00:00:00`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}


#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BidAsk {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub bid: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub ask: f64,
}

impl BidAsk {
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricePoint {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub snapshot_time: String,
    #[serde(rename = "snapshotTimeUTC")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub snapshot_time_utc: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub open_price: BidAsk,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub close_price: BidAsk,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub high_price: BidAsk,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub low_price: BidAsk,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub last_traded_volume: f64,
}


/// **Endpoint:** `GET /prices/{epic}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricesResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub prices: Vec<PricePoint>,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub instrument_type: String,
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationNode {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub name: String,
}


/// **Endpoint:** `GET /marketnavigation` and `GET /marketnavigation/{nodeId}`
///
/// Leaf nodes carry markets instead of child nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketNavigation {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub nodes: Vec<NavigationNode>,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub markets: Vec<Market>,
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSentiment {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub market_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub long_position_percentage: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub short_position_percentage: f64,
}


/// **Endpoint:** `GET /clientsentiment`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSentimentResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub client_sentiments: Vec<ClientSentiment>,
}


#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SentimentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_ids: Option<String>,
}
