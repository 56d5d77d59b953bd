//! Session lifecycle: login, sliding expiry, account switching and logout.
//!
//! The manager owns the only mutable shared state in the SDK, the token pair
//! and its expiry. Every authenticated call goes through
//! [`SessionManager::authenticated_request`], which refuses to touch the
//! network without a valid session and pushes the expiry forward after each
//! successful call.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::encryptor::encrypt_password;
use crate::auth::models::{
    EncryptionKeyResponse, LoginRequest, Session, SessionDetails, SessionInfo, SessionStatus,
    SwitchAccountRequest, SwitchAccountResponse,
};
use crate::clock::Clock;
use crate::errors::CapitalError;
use crate::helpers::parse_json;
use crate::transport::{
    ApiResponse, AuthTokens, HttpTransport, API_KEY_HEADER, CST_HEADER, SECURITY_TOKEN_HEADER,
};

const SESSION: &str = "/session";
const ENCRYPTION_KEY: &str = "/session/encryptionKey";

/// Sessions lapse after this many seconds without activity.
pub const SESSION_TTL_SECS: i64 = 600;

#[derive(Debug)]
pub struct SessionManager {
    transport: Arc<HttpTransport>,
    api_key: String,
    clock: Arc<dyn Clock>,
    state: Mutex<Option<Session>>,
}

impl SessionManager {
    pub fn new(
        transport: Arc<HttpTransport>,
        api_key: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        SessionManager {
            transport,
            api_key: api_key.into(),
            clock,
            state: Mutex::new(None),
        }
    }

    fn state(&self) -> MutexGuard<'_, Option<Session>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_expiry(&self) -> DateTime<Utc> {
        self.clock.now() + Duration::seconds(SESSION_TTL_SECS)
    }

    /// Log in and start a session.
    ///
    /// Unless `already_encrypted` is set, a one-time key is fetched first and
    /// the password is encrypted with it. The tokens come back as `CST` and
    /// `X-SECURITY-TOKEN` response headers; both must be present.
    pub async fn create_session(
        &self,
        identifier: &str,
        password: &str,
        already_encrypted: bool,
    ) -> Result<SessionDetails, CapitalError> {
        let encrypted = if already_encrypted {
            password.to_string()
        } else {
            self.encrypt_password(password).await?
        };

        let body = LoginRequest {
            identifier,
            password: &encrypted,
            encrypted_password: true,
        };
        let resp = self
            .transport
            .post(SESSION, Some(&body), &[(API_KEY_HEADER, self.api_key.as_str())])
            .await?;

        let (Some(cst), Some(security_token)) =
            (resp.header(CST_HEADER), resp.header(SECURITY_TOKEN_HEADER))
        else {
            // A login that hands back no tokens also ends any earlier session.
            *self.state() = None;
            self.transport.set_auth_tokens(None);
            return Err(CapitalError::authentication("Session tokens not received"));
        };
        let details: SessionDetails = parse_json(&resp.body)?;
        let tokens = AuthTokens {
            cst,
            security_token,
        };

        *self.state() = Some(Session {
            tokens: tokens.clone(),
            details: details.clone(),
            expiry: self.next_expiry(),
        });
        self.transport.set_auth_tokens(Some(tokens));

        info!(account_id = %details.current_account_id, "session created");
        Ok(details)
    }

    /// Fetch the current session from the server.
    pub async fn get_session(&self) -> Result<SessionInfo, CapitalError> {
        let resp = self
            .authenticated_request::<()>(Method::GET, SESSION, None)
            .await?;
        parse_json(&resp.body)
    }

    /// Make `account_id` the active account.
    ///
    /// The server may rotate the security token; when it does the new one is
    /// adopted, otherwise the current one stays in use.
    pub async fn switch_account(
        &self,
        account_id: &str,
    ) -> Result<SwitchAccountResponse, CapitalError> {
        let body = SwitchAccountRequest { account_id };
        let resp = self
            .authenticated_request(Method::PUT, SESSION, Some(&body))
            .await?;

        let rotated = resp.header(SECURITY_TOKEN_HEADER);
        let tokens = {
            let mut state = self.state();
            match state.as_mut() {
                Some(session) => {
                    if let Some(token) = rotated {
                        session.tokens.security_token = token;
                    }
                    session.details.current_account_id = account_id.to_string();
                    Some(session.tokens.clone())
                }
                None => None,
            }
        };
        if tokens.is_some() {
            self.transport.set_auth_tokens(tokens);
        }

        info!(account_id = %account_id, "switched account");
        parse_json(&resp.body)
    }

    /// Log out. Never fails.
    ///
    /// The server-side delete is best effort; local state and the transport
    /// headers are cleared whatever happens to it.
    pub async fn destroy_session(&self) {
        if self.cst_token().is_some() {
            if let Err(e) = self.transport.delete::<()>(SESSION, None, &[]).await {
                warn!("error during logout: {}", e.full_message());
            }
        }

        *self.state() = None;
        self.transport.set_auth_tokens(None);
        info!("session destroyed");
    }

    /// Send an authenticated request through the transport.
    ///
    /// Fails with an authentication error, without any I/O, when there is no
    /// valid session. A successful response slides the expiry forward.
    pub async fn authenticated_request<T>(
        &self,
        method: Method,
        path: &str,
        json_body: Option<&T>,
    ) -> Result<ApiResponse, CapitalError>
    where
        T: Serialize + ?Sized,
    {
        self.ensure_valid_session()?;
        let resp = self.transport.request(method, path, json_body, &[]).await?;
        self.refresh_expiry();
        Ok(resp)
    }

    pub fn ensure_valid_session(&self) -> Result<(), CapitalError> {
        if self.has_valid_session() {
            Ok(())
        } else {
            Err(CapitalError::no_session())
        }
    }

    fn refresh_expiry(&self) {
        let expiry = self.next_expiry();
        if let Some(session) = self.state().as_mut() {
            session.expiry = expiry;
        }
    }

    pub fn has_valid_session(&self) -> bool {
        let now = self.clock.now();
        self.state()
            .as_ref()
            .map(|s| s.is_valid_at(now))
            .unwrap_or(false)
    }

    pub fn status(&self) -> SessionStatus {
        let now = self.clock.now();
        match self.state().as_ref() {
            None => SessionStatus::NoSession,
            Some(s) if s.is_valid_at(now) => SessionStatus::Active,
            Some(_) => SessionStatus::Expired,
        }
    }

    pub fn tokens(&self) -> Option<AuthTokens> {
        self.state().as_ref().map(|s| s.tokens.clone())
    }

    pub fn cst_token(&self) -> Option<String> {
        self.state().as_ref().map(|s| s.tokens.cst.clone())
    }

    pub fn security_token(&self) -> Option<String> {
        self.state().as_ref().map(|s| s.tokens.security_token.clone())
    }

    /// Login body as cached at login, with the account id kept current.
    pub fn session_details(&self) -> Option<SessionDetails> {
        self.state().as_ref().map(|s| s.details.clone())
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.state().as_ref().map(|s| s.expiry)
    }

    async fn encrypt_password(&self, password: &str) -> Result<String, CapitalError> {
        let resp = self
            .transport
            .get(ENCRYPTION_KEY, &[(API_KEY_HEADER, self.api_key.as_str())])
            .await?;
        let key: EncryptionKeyResponse = serde_json::from_str(&resp.body).map_err(|e| {
            CapitalError::generic("Invalid encryption key response").with_source(e)
        })?;
        encrypt_password(&key.encryption_key, key.time_stamp, password)
    }
}
