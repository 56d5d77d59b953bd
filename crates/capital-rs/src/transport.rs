//! HTTP transport shared by the session manager and every endpoint module.
//!
//! The transport attaches the session headers when tokens are set, sends JSON
//! bodies and turns any non-2xx response into a [`CapitalError`]. There is no
//! retry: one failed attempt is returned to the caller as is.

use std::fmt;
use std::sync::Mutex;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use tracing::{debug, error, trace};
use url::Url;

use crate::config::TransportOptions;
use crate::errors::CapitalError;

pub const API_KEY_HEADER: &str = "X-CAP-API-KEY";
pub const CST_HEADER: &str = "CST";
pub const SECURITY_TOKEN_HEADER: &str = "X-SECURITY-TOKEN";

const SENSITIVE_HEADERS: [&str; 3] = [API_KEY_HEADER, CST_HEADER, SECURITY_TOKEN_HEADER];
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const REDACTED: &str = "***";

/// The two bearer tokens issued at login.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub cst: String,
    pub security_token: String,
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("cst", &REDACTED)
            .field("security_token", &REDACTED)
            .finish()
    }
}

/// A successful response with its headers kept around, since login tokens
/// arrive as headers rather than in the body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug)]
pub struct HttpTransport {
    http_client: Client,
    base_url: String,
    tokens: Mutex<Option<AuthTokens>>,
    debug: bool,
}

impl HttpTransport {
    pub fn new(base_url: &str, options: &TransportOptions) -> Result<Self, CapitalError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        default_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .danger_accept_invalid_certs(!options.verify_tls)
            .build()?;
        Ok(HttpTransport {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(None),
            debug: options.debug,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace (or with `None`, detach) the session headers sent on every request.
    pub fn set_auth_tokens(&self, tokens: Option<AuthTokens>) {
        let mut lock = self.tokens.lock().unwrap_or_else(|e| e.into_inner());
        *lock = tokens;
    }

    pub fn auth_tokens(&self) -> Option<AuthTokens> {
        self.tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub async fn get(
        &self,
        path: &str,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse, CapitalError> {
        self.request::<()>(Method::GET, path, None, headers).await
    }

    pub async fn post<T>(
        &self,
        path: &str,
        json_body: Option<&T>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse, CapitalError>
    where
        T: Serialize + ?Sized,
    {
        self.request(Method::POST, path, json_body, headers).await
    }

    pub async fn put<T>(
        &self,
        path: &str,
        json_body: Option<&T>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse, CapitalError>
    where
        T: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, json_body, headers).await
    }

    pub async fn delete<T>(
        &self,
        path: &str,
        json_body: Option<&T>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse, CapitalError>
    where
        T: Serialize + ?Sized,
    {
        self.request(Method::DELETE, path, json_body, headers).await
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        json_body: Option<&T>,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse, CapitalError>
    where
        T: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let parsed = Url::parse(&url)
            .map_err(|e| CapitalError::generic(format!("Invalid URL {url}: {e}")).with_source(e))?;

        let mut outgoing: Vec<(&str, String)> = headers
            .iter()
            .map(|(name, value)| (*name, value.to_string()))
            .collect();
        if let Some(tokens) = self.auth_tokens() {
            outgoing.push((CST_HEADER, tokens.cst));
            outgoing.push((SECURITY_TOKEN_HEADER, tokens.security_token));
        }

        debug!(
            method = %method,
            path = %path,
            headers = ?sanitize_headers(&outgoing),
            "sending request"
        );

        let mut request = self.http_client.request(method.clone(), parsed.as_str());
        for (name, value) in &outgoing {
            request = request.header(*name, value);
        }
        if let Some(body) = json_body {
            if self.debug {
                let value = serde_json::to_value(body)?;
                trace!(body = %sanitize_body(value), "request body");
            }
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let response_headers = resp.headers().clone();
        let body = resp.text().await?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "HTTP error response");
            return Err(CapitalError::from_response(status.as_u16(), &body));
        }

        debug!(method = %method, path = %path, status = status.as_u16(), "response received");
        if self.debug {
            trace!(body = %body, "response body");
        }

        Ok(ApiResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

fn sanitize_headers(headers: &[(&str, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if SENSITIVE_HEADERS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(name))
            {
                REDACTED.to_string()
            } else {
                value.clone()
            };
            (name.to_string(), shown)
        })
        .collect()
}

fn sanitize_body(mut body: serde_json::Value) -> serde_json::Value {
    if let Some(password) = body.get_mut("password") {
        *password = serde_json::Value::String(REDACTED.to_string());
    }
    body
}
