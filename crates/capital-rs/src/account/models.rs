//! Account module models.
//!
//! This module contains data structures for account functionality.

use std::collections::BTreeMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::helpers::deserialize_or_default;

pub use crate::auth::models::AccountBalance;


/// Response model for `GET /accounts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetAccountsResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub accounts: Vec<Account>,
}


/// Account data model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Display)]
#[display("account {account_id} ({account_name}) {currency}")]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub account_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub account_name: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub status: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub account_type: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub preferred: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub balance: AccountBalance,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub currency: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub symbol: String,
}


/// Leverage currently set for an instrument group and the allowed values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeverageSetting {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub current: u32,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub available: Vec<u32>,
}


/// Response model for `GET /accounts/preferences`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub hedging_mode: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub leverages: BTreeMap<String, LeverageSetting>,
}


/// Request model for `PUT /accounts/preferences`.
///
/// Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hedging_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverages: Option<BTreeMap<String, u32>>,
}


/// Status reply shared by update/delete style endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub status: String,
}
