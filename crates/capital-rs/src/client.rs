use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;

use crate::auth::models::{SessionDetails, SessionInfo, SessionStatus, SwitchAccountResponse};
use crate::auth::SessionManager;
use crate::clock::{Clock, SystemClock};
use crate::config::Configuration;
use crate::errors::CapitalError;
use crate::transport::{AuthTokens, HttpTransport};


const PING: &str = "/ping";


/// Main client for interacting with the Capital.com API.
///
/// The `CapitalClient` owns the transport and the session. Create one with
/// [`CapitalClient::new`], call [`login`](CapitalClient::login), then use the
/// endpoint methods below. Every endpoint method needs a valid session and
/// fails immediately, without a network call, when there is none.
///
/// # Available Endpoint Categories
///
/// ## Session
/// - [`login`](CapitalClient::login) / [`logout`](CapitalClient::logout)
/// - [`get_session`](CapitalClient::get_session) - Current session details
/// - [`switch_account`](CapitalClient::switch_account) - Change active account
/// - [`ping`](CapitalClient::ping) - Keep the session alive
///
/// ## Account
/// - [`get_accounts`](CapitalClient::get_accounts) - All accounts
/// - [`get_preferences`](CapitalClient::get_preferences) - Hedging mode and leverage
/// - [`update_preferences`](CapitalClient::update_preferences)
///
/// ## Markets
/// - [`get_server_time`](CapitalClient::get_server_time)
/// - [`search_markets`](CapitalClient::search_markets) - Search by term or epics
/// - [`get_market`](CapitalClient::get_market) - Single market details
/// - [`get_prices`](CapitalClient::get_prices) - Historical prices
/// - [`get_market_navigation`](CapitalClient::get_market_navigation)
/// - [`get_client_sentiment`](CapitalClient::get_client_sentiment)
///
/// ## Trading
/// - [`get_positions`](CapitalClient::get_positions) / [`open_position`](CapitalClient::open_position)
/// - [`close_position`](CapitalClient::close_position)
/// - [`get_working_orders`](CapitalClient::get_working_orders) / [`create_working_order`](CapitalClient::create_working_order)
/// - [`get_deal_confirmation`](CapitalClient::get_deal_confirmation)
/// - [`get_activity_history`](CapitalClient::get_activity_history) / [`get_transaction_history`](CapitalClient::get_transaction_history)
///
/// ## Watchlists
/// - [`get_watchlists`](CapitalClient::get_watchlists) / [`create_watchlist`](CapitalClient::create_watchlist)
/// - [`add_instrument`](CapitalClient::add_instrument) / [`remove_instrument`](CapitalClient::remove_instrument)
///
/// # Example
/// ```no_run
/// use capital_rs::{CapitalClient, Configuration};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CapitalClient::new(Configuration::new("api-key", true))?;
/// client.login("me@example.com", "password", false).await?;
///
/// let markets = client.search_markets(Some("Bitcoin"), None).await?;
/// println!("Found {} markets", markets.markets.len());
///
/// client.logout().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CapitalClient {
    pub(crate) config: Configuration,
    pub(crate) session: SessionManager,
}


impl CapitalClient {
    /// Create a new CapitalClient for the configured environment
    pub fn new(config: Configuration) -> Result<CapitalClient, CapitalError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }


    /// Create a client whose session expiry reads time from `clock`
    /// Useful for testing expiry without waiting
    pub fn with_clock(
        config: Configuration,
        clock: Arc<dyn Clock>,
    ) -> Result<CapitalClient, CapitalError> {
        let transport = Arc::new(HttpTransport::new(&config.rest_url(), config.options())?);
        let session = SessionManager::new(transport, config.api_key(), clock);
        Ok(CapitalClient { config, session })
    }


    pub fn config(&self) -> &Configuration {
        &self.config
    }


    pub fn session(&self) -> &SessionManager {
        &self.session
    }


    /// Log in with an email/username and password.
    ///
    /// Pass `already_encrypted = true` when `password` was encrypted beforehand.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        already_encrypted: bool,
    ) -> Result<SessionDetails, CapitalError> {
        self.session
            .create_session(identifier, password, already_encrypted)
            .await
    }


    /// Logout and drop the session. Local state is always cleared.
    pub async fn logout(&self) {
        self.session.destroy_session().await
    }


    pub async fn get_session(&self) -> Result<SessionInfo, CapitalError> {
        self.session.get_session().await
    }


    pub async fn switch_account(
        &self,
        account_id: &str,
    ) -> Result<SwitchAccountResponse, CapitalError> {
        self.session.switch_account(account_id).await
    }


    /// Ping to keep the session alive.
    ///
    /// **Endpoint:** `POST /ping`
    pub async fn ping(&self) -> Result<(), CapitalError> {
        self.authenticated_post::<()>(PING, None).await?;
        Ok(())
    }


    pub fn has_valid_session(&self) -> bool {
        self.session.has_valid_session()
    }


    pub fn session_status(&self) -> SessionStatus {
        self.session.status()
    }


    /// Streaming URL for the configured environment
    pub fn websocket_url(&self) -> &str {
        self.config.websocket_url()
    }


    pub fn cst_token(&self) -> Option<String> {
        self.session.cst_token()
    }


    pub fn security_token(&self) -> Option<String> {
        self.session.security_token()
    }


    /// Tokens the streaming client needs; `None` when logged out
    pub fn stream_credentials(&self) -> Option<AuthTokens> {
        self.session.tokens()
    }


    /// Wrapper for authenticated GET requests
    pub async fn authenticated_get(&self, path: &str) -> Result<String, CapitalError> {
        let resp = self
            .session
            .authenticated_request::<()>(Method::GET, path, None)
            .await?;
        Ok(resp.body)
    }


    /// Wrapper for authenticated POST requests
    pub async fn authenticated_post<T>(
        &self,
        path: &str,
        json_body: Option<&T>,
    ) -> Result<String, CapitalError>
    where
        T: Serialize + ?Sized,
    {
        let resp = self
            .session
            .authenticated_request(Method::POST, path, json_body)
            .await?;
        Ok(resp.body)
    }


    /// Wrapper for authenticated PUT requests
    pub async fn authenticated_put<T>(
        &self,
        path: &str,
        json_body: Option<&T>,
    ) -> Result<String, CapitalError>
    where
        T: Serialize + ?Sized,
    {
        let resp = self
            .session
            .authenticated_request(Method::PUT, path, json_body)
            .await?;
        Ok(resp.body)
    }


    /// Wrapper for authenticated DELETE requests
    pub async fn authenticated_delete<T>(
        &self,
        path: &str,
        json_body: Option<&T>,
    ) -> Result<String, CapitalError>
    where
        T: Serialize + ?Sized,
    {
        let resp = self
            .session
            .authenticated_request(Method::DELETE, path, json_body)
            .await?;
        Ok(resp.body)
    }
}
