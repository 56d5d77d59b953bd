//! Auth module models.
//!
//! Wire types for the login handshake plus the [`Session`] state owned by the
//! session manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::helpers::deserialize_or_default;
use crate::transport::AuthTokens;

/// One-time key used to encrypt the password before login.
///
/// **Endpoint:** `GET /session/encryptionKey`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionKeyResponse {
    pub encryption_key: String,
    pub time_stamp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
    pub encrypted_password: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SwitchAccountRequest<'a> {
    pub account_id: &'a str,
}

/// Money figures attached to an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountBalance {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub balance: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub deposit: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub profit_loss: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub available: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionAccount {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub account_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub account_name: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub preferred: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub account_type: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub currency: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub symbol: String,
    pub balance: Option<AccountBalance>,
}

/// Body of a successful login.
///
/// **Endpoint:** `POST /session`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionDetails {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub account_type: String,
    pub account_info: Option<AccountBalance>,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub currency_iso_code: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub currency_symbol: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub current_account_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub streaming_host: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub accounts: Vec<SessionAccount>,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub client_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub timezone_offset: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub has_active_demo_accounts: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub has_active_live_accounts: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub trailing_stops_enabled: bool,
}

/// Current session as reported by the server.
///
/// **Endpoint:** `GET /session`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionInfo {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub client_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub account_id: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub timezone_offset: f64,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub locale: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub currency: String,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub stream_endpoint: String,
}

/// **Endpoint:** `PUT /session`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitchAccountResponse {
    #[serde(deserialize_with = "deserialize_or_default")]
    pub trailing_stops_enabled: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub dealing_enabled: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub has_active_demo_accounts: bool,
    #[serde(deserialize_with = "deserialize_or_default")]
    pub has_active_live_accounts: bool,
}

/// Where the session manager currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SessionStatus {
    NoSession,
    Active,
    Expired,
}

/// Live session state: tokens, cached login body and the sliding expiry.
#[derive(Debug, Clone)]
pub struct Session {
    pub tokens: AuthTokens,
    pub details: SessionDetails,
    pub expiry: DateTime<Utc>,
}

impl Session {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.tokens.cst.is_empty() && !self.tokens.security_token.is_empty() && now < self.expiry
    }
}
