//! Client configuration.
//!
//! A [`Configuration`] is built once before the client is created and is
//! never mutated afterwards.

use std::env;
use std::time::Duration;

use crate::errors::CapitalError;

const LIVE_URL: &str = "https://api-capital.backend-capital.com";
const DEMO_URL: &str = "https://demo-api-capital.backend-capital.com";
const WEBSOCKET_LIVE_URL: &str = "wss://api-streaming-capital.backend-capital.com/connect";
const WEBSOCKET_DEMO_URL: &str = "wss://demo-api-streaming-capital.backend-capital.com/connect";

/// REST paths are mounted under this prefix on both hosts.
pub(crate) const API_PREFIX: &str = "/api/v1";

// Environment variable names
const CAPITAL_API_KEY: &str = "CAPITAL_API_KEY";
const CAPITAL_DEMO: &str = "CAPITAL_DEMO";

/// Which Capital.com environment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Demo,
    Live,
}

impl Environment {
    /// Read a `CAPITAL_DEMO` value.
    ///
    /// `false`, `0`, `no` and `live` select live; anything else, including
    /// unrecognized text, stays on demo.
    pub fn from_demo_flag(value: &str) -> Environment {
        let value = value.trim().to_ascii_lowercase();
        if value == "live" || parse_flag(&value) == Some(false) {
            Environment::Live
        } else {
            Environment::Demo
        }
    }

    pub fn is_demo(self) -> bool {
        self == Environment::Demo
    }

    pub fn rest_url(self) -> &'static str {
        match self {
            Environment::Demo => DEMO_URL,
            Environment::Live => LIVE_URL,
        }
    }

    pub fn websocket_url(self) -> &'static str {
        match self {
            Environment::Demo => WEBSOCKET_DEMO_URL,
            Environment::Live => WEBSOCKET_LIVE_URL,
        }
    }
}

/// Settings applied to the underlying HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub verify_tls: bool,
    /// Log sanitized request bodies and full response bodies at trace level.
    pub debug: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            verify_tls: true,
            debug: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Configuration {
    api_key: String,
    environment: Environment,
    options: TransportOptions,
    base_url: Option<String>,
    websocket_url: Option<String>,
}

impl Configuration {
    /// Create a configuration with default transport options.
    ///
    /// # Example
    /// ```
    /// use capital_rs::Configuration;
    ///
    /// let config = Configuration::new("my-api-key", true);
    /// assert!(config.is_demo());
    /// ```
    pub fn new(api_key: impl Into<String>, demo: bool) -> Self {
        let environment = if demo {
            Environment::Demo
        } else {
            Environment::Live
        };
        Self {
            api_key: api_key.into(),
            environment,
            options: TransportOptions::default(),
            base_url: None,
            websocket_url: None,
        }
    }

    /// Load from `CAPITAL_API_KEY` and `CAPITAL_DEMO`.
    ///
    /// `CAPITAL_DEMO` defaults to demo; see [`Environment::from_demo_flag`].
    pub fn from_env() -> Result<Self, CapitalError> {
        let api_key = env::var(CAPITAL_API_KEY).map_err(|_| {
            CapitalError::generic(format!("{CAPITAL_API_KEY} environment variable not set"))
        })?;
        let environment = env::var(CAPITAL_DEMO)
            .map(|v| Environment::from_demo_flag(&v))
            .unwrap_or_default();
        Ok(Self::new(api_key, environment.is_demo()))
    }

    pub fn with_options(mut self, options: TransportOptions) -> Self {
        self.options = options;
        self
    }

    /// Point REST calls at another host, e.g. a local mock server.
    /// The `/api/v1` prefix is still appended.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_websocket_url(mut self, url: impl Into<String>) -> Self {
        self.websocket_url = Some(url.into());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn is_demo(&self) -> bool {
        self.environment == Environment::Demo
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Root URL for REST requests, including the API prefix.
    pub fn rest_url(&self) -> String {
        let host = self
            .base_url
            .as_deref()
            .unwrap_or(self.environment.rest_url())
            .trim_end_matches('/');
        format!("{host}{API_PREFIX}")
    }

    pub fn websocket_url(&self) -> &str {
        self.websocket_url
            .as_deref()
            .unwrap_or(self.environment.websocket_url())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
