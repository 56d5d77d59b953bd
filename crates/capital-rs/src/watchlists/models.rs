//! Watchlists module models.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::helpers::deserialize_or_default;
use crate::markets::models::Market;


#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Display)]
#[display("watchlist {id} ({name})")]
#[serde(rename_all = "camelCase", default)]
pub struct Watchlist {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub name: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub editable: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deleteable: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub default_system_watchlist: bool,
}


/// **Endpoint:** `GET /watchlists`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GetWatchlistsResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub watchlists: Vec<Watchlist>,
}


/// Markets on one watchlist.
///
/// **Endpoint:** `GET /watchlists/{id}`
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WatchlistMarkets {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub markets: Vec<Market>,
}


#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]


/// Request model for `POST /watchlists`.
///
pub struct CreateWatchlistRequest {
    pub name: String,
    pub epics: Vec<String>,
}


#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateWatchlistResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub watchlist_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub status: String,
}


/// Request model for `PUT /watchlists/{id}`. Unset fields are left out.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWatchlistRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic: Option<String>,
}
