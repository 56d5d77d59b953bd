//! Account module endpoints.
//!
//! Accounts listing and account preferences (hedging mode, leverage).

use std::collections::BTreeMap;

use crate::account::models::{
    GetAccountsResponse, Preferences, StatusResponse, UpdatePreferencesRequest,
};
use crate::client::CapitalClient;
use crate::errors::CapitalError;
use crate::helpers::parse_json;


const GET_ACCOUNTS: &str = "/accounts";
const PREFERENCES: &str = "/accounts/preferences";


impl CapitalClient {
    /// Get all accounts.
    ///
    /// **Endpoint:** `GET /accounts`
    pub async fn get_accounts(&self) -> Result<GetAccountsResponse, CapitalError> {
        let resp = self.authenticated_get(GET_ACCOUNTS).await?;
        parse_json(&resp)
    }


    /// Get account preferences including trading mode and leverage settings.
    ///
    /// **Endpoint:** `GET /accounts/preferences`
    pub async fn get_preferences(&self) -> Result<Preferences, CapitalError> {
        let resp = self.authenticated_get(PREFERENCES).await?;
        parse_json(&resp)
    }


    /// Update account preferences.
    ///
    /// **Endpoint:** `PUT /accounts/preferences`
    pub async fn update_preferences(
        &self,
        body: &UpdatePreferencesRequest,
    ) -> Result<StatusResponse, CapitalError> {
        let resp = self.authenticated_put(PREFERENCES, Some(body)).await?;
        parse_json(&resp)
    }


    /// Turn hedging mode on or off.
    pub async fn set_hedging_mode(&self, enabled: bool) -> Result<StatusResponse, CapitalError> {
        self.update_preferences(&UpdatePreferencesRequest {
            hedging_mode: Some(enabled),
            ..Default::default()
        })
        .await
    }


    /// Set leverage per instrument group, e.g. `{"SHARES": 5}`.
    pub async fn update_leverages(
        &self,
        leverages: BTreeMap<String, u32>,
    ) -> Result<StatusResponse, CapitalError> {
        self.update_preferences(&UpdatePreferencesRequest {
            leverages: Some(leverages),
            ..Default::default()
        })
        .await
    }
}
