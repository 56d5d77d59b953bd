//! Trading module models.
//!
//! This module contains data structures for positions, working orders,
//! deal confirmations and account history.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::errors::{CapitalError, ErrorKind};
use crate::helpers::deserialize_or_default;
use crate::markets::models::Market;


/// Deal direction. Serialized upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    #[display("BUY")]
    Buy,
    #[display("SELL")]
    Sell,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }
}

impl FromStr for Direction {
    type Err = CapitalError;

    /// Case-insensitive: `buy`, `Buy` and `BUY` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Direction::Buy),
            "SELL" => Ok(Direction::Sell),
            other => Err(CapitalError::new(
                ErrorKind::Validation,
                format!("Invalid direction: {other}"),
            )),
        }
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    #[default]
    #[display("MARKET")]
    Market,
    #[display("LIMIT")]
    Limit,
    #[display("STOP")]
    Stop,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    #[display("FILL_OR_KILL")]
    FillOrKill,
    #[display("IMMEDIATE_OR_CANCEL")]
    ImmediateOrCancel,
    #[display("GOOD_TILL_CANCELLED")]
    GoodTillCancelled,
    #[display("GOOD_TILL_DATE")]
    GoodTillDate,
}


#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Display)]
#[display("position {deal_id} {direction} {size} {epic}")]
#[serde(rename_all = "camelCase", default)]


/// Open position data model.
///
pub struct Position {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deal_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deal_reference: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub epic: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub direction: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub size: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub level: f64,
    pub stop_level: Option<f64>,
    pub limit_level: Option<f64>,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub currency: String,
    #[serde(alias = "upl")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub profit: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub leverage: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub guaranteed_stop: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub status: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub created_date: String,
    #[serde(rename = "createdDateUTC")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub created_date_utc: String,
}

impl Position {
    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }

    pub fn is_long(&self) -> bool {
        self.direction.eq_ignore_ascii_case("BUY")
    }

    pub fn is_short(&self) -> bool {
        self.direction.eq_ignore_ascii_case("SELL")
    }
}


/// A position together with the market it is open on.
///
/// **Endpoint:** `GET /positions/{dealId}`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionDetails {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub position: Position,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub market: Market,
}


/// **Endpoint:** `GET /positions`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GetPositionsResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub positions: Vec<PositionDetails>,
}


#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]


/// Request model for `POST /positions`.
///
/// Built with [`OpenPositionRequest::new`], which applies the defaults
/// `MARKET` / `FILL_OR_KILL` / no guaranteed stop.
pub struct OpenPositionRequest {
    pub epic: String,
    pub direction: Direction,
    pub size: f64,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub guaranteed_stop: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_level: Option<f64>,
}

impl OpenPositionRequest {
    pub fn new(epic: impl Into<String>, direction: Direction, size: f64) -> Self {
        OpenPositionRequest {
            epic: epic.into(),
            direction,
            size,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::FillOrKill,
            guaranteed_stop: false,
            level: None,
            stop_level: None,
            limit_level: None,
        }
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = order_type;
        self
    }

    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    pub fn level(mut self, level: f64) -> Self {
        self.level = Some(level);
        self
    }

    pub fn stop_level(mut self, stop_level: f64) -> Self {
        self.stop_level = Some(stop_level);
        self
    }

    pub fn limit_level(mut self, limit_level: f64) -> Self {
        self.limit_level = Some(limit_level);
        self
    }

    pub fn guaranteed_stop(mut self, guaranteed_stop: bool) -> Self {
        self.guaranteed_stop = guaranteed_stop;
        self
    }
}


/// Request model for `PUT /positions/{dealId}`. Unset fields are left out.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePositionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guaranteed_stop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_stop: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_distance: Option<f64>,
}


/// Body sent with `DELETE /positions/{dealId}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClosePositionRequest {
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}


#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Display)]
#[display("working order {deal_id} {direction} {size} {epic} @ {level}")]
#[serde(rename_all = "camelCase", default)]


/// Working order data model.
///
/// Accepts both the short (`size`, `level`, `type`) and the long
/// (`orderSize`, `orderLevel`, `orderType`) field names.
pub struct WorkingOrder {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deal_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub epic: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub direction: String,
    #[serde(alias = "orderSize")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub size: f64,
    #[serde(alias = "orderLevel")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub level: f64,
    #[serde(rename = "type", alias = "orderType")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub type_: String,
    pub stop_level: Option<f64>,
    pub limit_level: Option<f64>,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub time_in_force: String,
    pub good_till_date: Option<String>,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub guaranteed_stop: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub currency_code: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub created_date: String,
}

impl WorkingOrder {
    pub fn is_buy_order(&self) -> bool {
        self.direction.eq_ignore_ascii_case("BUY")
    }

    pub fn is_sell_order(&self) -> bool {
        self.direction.eq_ignore_ascii_case("SELL")
    }

    pub fn is_limit_order(&self) -> bool {
        self.type_.eq_ignore_ascii_case("LIMIT")
    }

    pub fn is_stop_order(&self) -> bool {
        self.type_.eq_ignore_ascii_case("STOP")
    }

    pub fn is_good_till_cancelled(&self) -> bool {
        self.time_in_force.eq_ignore_ascii_case("GOOD_TILL_CANCELLED")
    }
}


/// **Endpoint:** `GET /workingorders/{dealId}`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkingOrderDetails {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub working_order_data: WorkingOrder,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub market_data: Market,
}


/// **Endpoint:** `GET /workingorders`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GetWorkingOrdersResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub working_orders: Vec<WorkingOrderDetails>,
}


/// Request model for `POST /workingorders`.
///
/// [`CreateWorkingOrderRequest::new`] defaults to `LIMIT` /
/// `GOOD_TILL_CANCELLED` / no guaranteed stop.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkingOrderRequest {
    pub epic: String,
    pub direction: Direction,
    pub size: f64,
    pub level: f64,
    #[serde(rename = "type")]
    pub type_: OrderType,
    pub time_in_force: TimeInForce,
    pub guaranteed_stop: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub good_till_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_level: Option<f64>,
}

impl CreateWorkingOrderRequest {
    pub fn new(epic: impl Into<String>, direction: Direction, size: f64, level: f64) -> Self {
        CreateWorkingOrderRequest {
            epic: epic.into(),
            direction,
            size,
            level,
            type_: OrderType::Limit,
            time_in_force: TimeInForce::GoodTillCancelled,
            guaranteed_stop: false,
            good_till_date: None,
            stop_level: None,
            limit_level: None,
        }
    }

    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.type_ = order_type;
        self
    }

    /// Also switches time in force to `GOOD_TILL_DATE`.
    pub fn good_till_date(mut self, date: impl Into<String>) -> Self {
        self.good_till_date = Some(date.into());
        self.time_in_force = TimeInForce::GoodTillDate;
        self
    }

    pub fn stop_level(mut self, stop_level: f64) -> Self {
        self.stop_level = Some(stop_level);
        self
    }

    pub fn limit_level(mut self, limit_level: f64) -> Self {
        self.limit_level = Some(limit_level);
        self
    }

    pub fn guaranteed_stop(mut self, guaranteed_stop: bool) -> Self {
        self.guaranteed_stop = guaranteed_stop;
        self
    }
}


#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]


/// Request model for `PUT /workingorders/{dealId}`.
///
pub struct UpdateWorkingOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub good_till_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
}


/// Reply to every create/update/close/cancel call. Pass the reference to
/// [`get_deal_confirmation`](crate::client::CapitalClient::get_deal_confirmation).
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DealReferenceResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deal_reference: String,
}


#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AffectedDeal {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deal_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub status: String,
}


/// **Endpoint:** `GET /confirms/{dealReference}`
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Display)]
#[display("deal {deal_reference} {deal_status}")]
#[serde(rename_all = "camelCase", default)]
pub struct DealConfirmation {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub date: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub status: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deal_status: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub epic: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deal_reference: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deal_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub affected_deals: Vec<AffectedDeal>,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub level: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub size: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub direction: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub guaranteed_stop: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub trailing_stop: bool,
}

impl DealConfirmation {
    pub fn is_accepted(&self) -> bool {
        self.deal_status.eq_ignore_ascii_case("ACCEPTED")
    }
}


/// Query parameters for `GET /history/activity`.
///
/// `detailed` is always sent.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityHistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Seconds back from now
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_period: Option<u64>,
    pub detailed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    /// FIQL filter, e.g. `source!=DEALER;type!=POSITION`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}


#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Activity {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub date: String,
    #[serde(rename = "dateUTC")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub date_utc: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub epic: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deal_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub source: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub type_: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub status: String,
    /// Only present for detailed queries
    pub details: Option<serde_json::Value>,
}


/// **Endpoint:** `GET /history/activity`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityHistoryResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub activities: Vec<Activity>,
}


/// Query parameters for `GET /history/transactions`.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_period: Option<u64>,
    /// e.g. `DEPOSIT`, `WITHDRAWAL`, `TRADE`, `SWAP`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}


#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub date: String,
    #[serde(alias = "dateUTC")]
    #[serde(deserialize_with = "deserialize_or_default")]
    pub date_utc: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub instrument_name: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub transaction_type: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub note: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub reference: String,
    /// Signed amount as sent by the API, e.g. `"-2.43"`
    #[serde(deserialize_with = "deserialize_or_default")]
    pub size: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub currency: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub status: String,
}


/// **Endpoint:** `GET /history/transactions`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionHistoryResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub transactions: Vec<Transaction>,
}
