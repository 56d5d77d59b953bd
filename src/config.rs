use std::env;

use anyhow::{Context, Result};
use capital_rs::Environment;
use capital_rs::markets::models::Resolution;

/// Monitor settings.
///
/// Defaults watch a handful of liquid demo markets for one minute.
#[derive(Clone)]
pub struct Config {
    // Credentials. The password is encrypted before it leaves the process.
    pub api_key: String,
    pub identifier: String,
    pub password: String,

    // Demo or live environment.
    pub demo: bool,

    // Epics to snapshot and stream quotes for.
    pub epics: Vec<String>,

    // Epics to fetch candles and stream OHLC bars for.
    pub ohlc_epics: Vec<String>,
    pub ohlc_resolution: Resolution,
    pub ohlc_history: u32, // candles fetched per epic at startup

    // Streaming time box in seconds. 0 skips streaming entirely.
    pub stream_secs: u64,

    // Keep-alive period. The session dies after 10 idle minutes,
    // so keep this well under 600.
    pub keepalive_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            identifier: String::new(),
            password: String::new(),

            demo: true,

            epics: ["GOLD", "SILVER", "EUR_USD", "GBP_USD", "OIL_CRUDE"]
                .into_iter()
                .map(String::from)
                .collect(),

            ohlc_epics: vec!["GOLD".to_string(), "SILVER".to_string()],
            ohlc_resolution: Resolution::Minute,
            ohlc_history: 10,

            stream_secs: 60,
            keepalive_secs: 300,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("identifier", &self.identifier)
            .field("demo", &self.demo)
            .field("epics", &self.epics)
            .field("ohlc_epics", &self.ohlc_epics)
            .field("ohlc_resolution", &self.ohlc_resolution)
            .field("stream_secs", &self.stream_secs)
            .field("keepalive_secs", &self.keepalive_secs)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Read `CAPITAL_*` variables; unset optional ones keep their default.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Config::default();

        cfg.api_key = env::var("CAPITAL_API_KEY").context("CAPITAL_API_KEY is not set")?;
        cfg.identifier = env::var("CAPITAL_IDENTIFIER").context("CAPITAL_IDENTIFIER is not set")?;
        cfg.password = env::var("CAPITAL_PASSWORD").context("CAPITAL_PASSWORD is not set")?;

        if let Ok(demo) = env::var("CAPITAL_DEMO") {
            cfg.demo = Environment::from_demo_flag(&demo).is_demo();
        }
        if let Ok(epics) = env::var("CAPITAL_EPICS") {
            cfg.epics = split_list(&epics);
        }
        if let Ok(epics) = env::var("CAPITAL_OHLC_EPICS") {
            cfg.ohlc_epics = split_list(&epics);
        }
        if let Ok(secs) = env::var("CAPITAL_STREAM_SECS") {
            cfg.stream_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("CAPITAL_STREAM_SECS is not a number: {secs}"))?;
        }
        if let Ok(secs) = env::var("CAPITAL_KEEPALIVE_SECS") {
            cfg.keepalive_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("CAPITAL_KEEPALIVE_SECS is not a number: {secs}"))?;
        }
        if cfg.keepalive_secs == 0 {
            anyhow::bail!("CAPITAL_KEEPALIVE_SECS must be positive");
        }

        Ok(cfg)
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_uppercase())
        .collect()
}
