//! Watchlists module endpoints.
//!
//! Create, inspect, rename and delete watchlists and manage the markets on
//! them.

use crate::account::models::StatusResponse;
use crate::client::CapitalClient;
use crate::errors::CapitalError;
use crate::helpers::{encode_segment, parse_json, with_segment};
use crate::watchlists::models::{
    CreateWatchlistRequest, CreateWatchlistResponse, GetWatchlistsResponse,
    UpdateWatchlistRequest, WatchlistMarkets,
};


const WATCHLISTS: &str = "/watchlists";
const WATCHLIST: &str = "/watchlists/{}";
const WATCHLIST_INSTRUMENT: &str = "/watchlists/{id}/{epic}";


impl CapitalClient {
    /// **Endpoint:** `GET /watchlists`
    pub async fn get_watchlists(&self) -> Result<GetWatchlistsResponse, CapitalError> {
        let resp = self.authenticated_get(WATCHLISTS).await?;
        parse_json(&resp)
    }


    /// **Endpoint:** `GET /watchlists/{id}`
    pub async fn get_watchlist(&self, watchlist_id: &str) -> Result<WatchlistMarkets, CapitalError> {
        let url = with_segment(WATCHLIST, watchlist_id);
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }


    /// Create a watchlist, optionally seeded with markets.
    ///
    /// **Endpoint:** `POST /watchlists`
    pub async fn create_watchlist(
        &self,
        name: &str,
        epics: &[&str],
    ) -> Result<CreateWatchlistResponse, CapitalError> {
        let body = CreateWatchlistRequest {
            name: name.to_string(),
            epics: epics.iter().map(|e| e.to_string()).collect(),
        };
        let resp = self.authenticated_post(WATCHLISTS, Some(&body)).await?;
        parse_json(&resp)
    }


    /// **Endpoint:** `PUT /watchlists/{id}`
    pub async fn update_watchlist(
        &self,
        watchlist_id: &str,
        body: &UpdateWatchlistRequest,
    ) -> Result<StatusResponse, CapitalError> {
        let url = with_segment(WATCHLIST, watchlist_id);
        let resp = self.authenticated_put(&url, Some(body)).await?;
        parse_json(&resp)
    }


    /// **Endpoint:** `DELETE /watchlists/{id}`
    pub async fn delete_watchlist(&self, watchlist_id: &str) -> Result<StatusResponse, CapitalError> {
        let url = with_segment(WATCHLIST, watchlist_id);
        let resp = self.authenticated_delete::<()>(&url, None).await?;
        parse_json(&resp)
    }


    /// **Endpoint:** `PUT /watchlists/{id}/{epic}`
    pub async fn add_instrument(
        &self,
        watchlist_id: &str,
        epic: &str,
    ) -> Result<StatusResponse, CapitalError> {
        let url = WATCHLIST_INSTRUMENT
            .replace("{id}", &encode_segment(watchlist_id))
            .replace("{epic}", &encode_segment(epic));
        let resp = self.authenticated_put::<()>(&url, None).await?;
        parse_json(&resp)
    }


    /// **Endpoint:** `DELETE /watchlists/{id}/{epic}`
    pub async fn remove_instrument(
        &self,
        watchlist_id: &str,
        epic: &str,
    ) -> Result<StatusResponse, CapitalError> {
        let url = WATCHLIST_INSTRUMENT
            .replace("{id}", &encode_segment(watchlist_id))
            .replace("{epic}", &encode_segment(epic));
        let resp = self.authenticated_delete::<()>(&url, None).await?;
        parse_json(&resp)
    }
}
