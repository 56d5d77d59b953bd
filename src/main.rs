mod config;
mod report;
mod state;
mod ws;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use std::sync::Arc;
use dotenv::dotenv;

use state::Shared;
use config::Config;

use capital_rs::{CapitalClient, CapitalWebsocketClient, Configuration};
use capital_rs::markets::models::PricesQuery;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Basic logging: set RUST_LOG=info (or debug) to see output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = Config::from_env()?;
    info!(cfg = ?cfg, "starting");

    let configuration = Configuration::new(cfg.api_key.clone(), cfg.demo);
    let http = Arc::new(CapitalClient::new(configuration)?);

    let details = http
        .login(&cfg.identifier, &cfg.password, false)
        .await
        .context("login failed")?;
    report::log_session(&details);

    // Whatever happens below, the session is closed on the way out.
    let result = run(&cfg, http.clone()).await;
    http.logout().await;
    info!("logged out");
    result
}

async fn run(cfg: &Config, http: Arc<CapitalClient>) -> Result<()> {
    snapshot(cfg, &http).await?;

    if cfg.stream_secs == 0 {
        info!("streaming disabled");
        return Ok(());
    }

    let tokens = http
        .stream_credentials()
        .context("session has no stream credentials")?;
    let ws_client = CapitalWebsocketClient::new(http.websocket_url(), tokens);
    let shared = Shared::new(&cfg.epics);

    ws::task::run_stream(ws_client, http.clone(), cfg.clone(), shared.clone()).await?;

    for (epic, st) in shared.snapshot() {
        report::log_stream_summary(&epic, &st);
    }
    Ok(())
}

/// One pass over account state and the configured markets.
async fn snapshot(cfg: &Config, http: &CapitalClient) -> Result<()> {
    let accounts = http.get_accounts().await.context("get_accounts failed")?;
    for account in &accounts.accounts {
        report::log_account(account);
    }

    let prefs = http.get_preferences().await.context("get_preferences failed")?;
    report::log_preferences(&prefs);

    let positions = http.get_positions().await.context("get_positions failed")?;
    info!(count = positions.positions.len(), "open positions");
    for p in &positions.positions {
        report::log_position(p);
    }

    let orders = http
        .get_working_orders()
        .await
        .context("get_working_orders failed")?;
    info!(count = orders.working_orders.len(), "working orders");
    for o in &orders.working_orders {
        report::log_working_order(o);
    }

    if !cfg.epics.is_empty() {
        let epics: Vec<&str> = cfg.epics.iter().map(|s| s.as_str()).collect();
        let markets = http
            .search_markets(None, Some(epics.as_slice()))
            .await
            .context("markets lookup failed")?;
        for m in &markets.markets {
            report::log_market(m);
        }
    }

    let query = PricesQuery {
        resolution: cfg.ohlc_resolution,
        max: Some(cfg.ohlc_history),
        ..Default::default()
    };
    for epic in &cfg.ohlc_epics {
        // A bad epic should not stop the monitor.
        match http.get_prices(epic, &query).await {
            Ok(prices) => report::log_candles(epic, &prices.prices),
            Err(e) => warn!(epic = %epic, "prices failed: {}", e.full_message()),
        }
    }

    Ok(())
}
