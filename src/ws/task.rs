use anyhow::{Context, Result};
use tokio::time::{interval_at, sleep, Duration, Instant};
use tracing::{debug, info, warn};

use std::sync::Arc;

use capital_rs::{CapitalClient, CapitalWebsocketClient};
use capital_rs::websocket::models::{
    CapitalSocketMessage, ErrorResponse, OhlcUpdate, QuoteUpdate, SubscriptionResponse,
};

use crate::config::Config;
use crate::state::Shared;

const BAR_TYPE: &str = "classic";

fn as_refs(v: &[String]) -> Vec<&str> {
    v.iter().map(|s| s.as_str()).collect()
}

/// Stream quotes and bars until the time box ends or the server hangs up.
///
/// One connection, no reconnect. Every keep-alive period both the stream
/// and the REST session get pinged.
pub async fn run_stream(
    ws: CapitalWebsocketClient,
    http: Arc<CapitalClient>,
    cfg: Config,
    shared: Shared,
) -> Result<()> {
    ws.connect().await.context("ws connect failed")?;

    let epics = as_refs(&cfg.epics);
    let ohlc_epics = as_refs(&cfg.ohlc_epics);
    let resolutions = [cfg.ohlc_resolution];

    if !epics.is_empty() {
        ws.subscribe_market_data(&epics).await.context("quote subscribe failed")?;
    }
    if !ohlc_epics.is_empty() {
        ws.subscribe_ohlc(&ohlc_epics, &resolutions, BAR_TYPE)
            .await
            .context("ohlc subscribe failed")?;
    }
    info!(
        quotes = epics.len(),
        bars = ohlc_epics.len(),
        secs = cfg.stream_secs,
        "ws connected+subscribed"
    );

    let period = Duration::from_secs(cfg.keepalive_secs);
    let mut keepalive = interval_at(Instant::now() + period, period);
    let deadline = sleep(Duration::from_secs(cfg.stream_secs));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            msg = ws.next_message() => {
                let msg = match msg {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("ws read error: {e} (stopping)");
                        break;
                    }
                };

                match msg {
                    CapitalSocketMessage::Quote(q) => handle_quote(&shared, q),
                    CapitalSocketMessage::Ohlc(bar) => handle_ohlc(&shared, bar),
                    CapitalSocketMessage::SubscribedResponse(sr) => handle_subscribed(sr),
                    CapitalSocketMessage::UnsubscribedResponse(sr) => {
                        info!(destination = %sr.destination, "unsubscribed");
                    }
                    CapitalSocketMessage::PingResponse(p) => {
                        debug!(id = ?p.correlation_id, "stream pong");
                    }
                    CapitalSocketMessage::ErrorResponse(err) => handle_err(err),
                    CapitalSocketMessage::Unparseable(text) => {
                        debug!(text = %text, "unrecognized stream message");
                    }
                    CapitalSocketMessage::Close(frame) => {
                        info!(frame = ?frame, "server closed the stream");
                        break;
                    }
                    _ => {}
                }
            }

            _ = keepalive.tick() => {
                if let Err(e) = ws.ping().await {
                    warn!("stream ping failed: {e}");
                }
                if let Err(e) = http.ping().await {
                    warn!("session ping failed: {e}");
                }
            }

            _ = &mut deadline => {
                info!("stream time box reached");
                break;
            }
        }
    }

    if ws.is_connected().await {
        if !epics.is_empty() {
            let _ = ws.unsubscribe_market_data(&epics).await;
        }
        if !ohlc_epics.is_empty() {
            let _ = ws.unsubscribe_ohlc(&ohlc_epics, &resolutions, BAR_TYPE).await;
        }
    }
    if let Err(e) = ws.close().await {
        warn!("ws close failed: {e}");
    }
    Ok(())
}

fn handle_quote(shared: &Shared, q: QuoteUpdate) {
    debug!(epic = %q.epic, bid = q.bid, ofr = q.ofr, spread = q.spread(), "quote");
    shared.apply_quote(q);
}

fn handle_ohlc(shared: &Shared, bar: OhlcUpdate) {
    info!(
        epic = %bar.epic,
        resolution = %bar.resolution,
        price_type = %bar.price_type,
        t = ?bar.time(),
        o = bar.o,
        h = bar.h,
        l = bar.l,
        c = bar.c,
        "bar"
    );
    shared.apply_bar(bar);
}

fn handle_subscribed(sr: SubscriptionResponse) {
    let rejected = sr.rejected();
    if rejected.is_empty() {
        info!(destination = %sr.destination, epics = sr.subscriptions.len(), "subscribed");
    } else {
        warn!(destination = %sr.destination, rejected = ?rejected, "subscription partly rejected");
    }
}

fn handle_err(err: ErrorResponse) {
    warn!(
        "ws error status={} destination={} id={:?} payload={}",
        err.status, err.destination, err.correlation_id, err.payload
    );
}
