// src/report.rs
use tracing::info;

use capital_rs::account::models::{Account, Preferences};
use capital_rs::auth::models::SessionDetails;
use capital_rs::markets::models::{Market, PricePoint};
use capital_rs::trading::models::{PositionDetails, WorkingOrderDetails};

use crate::state::EpicState;

pub fn log_session(details: &SessionDetails) {
    info!(
        client_id = %details.client_id,
        account_id = %details.current_account_id,
        account_type = %details.account_type,
        currency = %details.currency_iso_code,
        accounts = details.accounts.len(),
        "logged in"
    );
}

pub fn log_account(account: &Account) {
    info!(
        account_id = %account.account_id,
        name = %account.account_name,
        preferred = account.preferred,
        currency = %account.currency,
        balance = account.balance.balance,
        available = account.balance.available,
        pnl = account.balance.profit_loss,
        "account"
    );
}

pub fn log_preferences(prefs: &Preferences) {
    let leverages: Vec<String> = prefs
        .leverages
        .iter()
        .map(|(class, lev)| format!("{class}={}", lev.current))
        .collect();
    info!(hedging = prefs.hedging_mode, leverages = ?leverages, "preferences");
}

pub fn log_position(details: &PositionDetails) {
    let pos = &details.position;
    info!(
        deal_id = %pos.deal_id,
        epic = %pos.epic,
        direction = %pos.direction,
        size = pos.size,
        level = pos.level,
        stop = ?pos.stop_level,
        limit = ?pos.limit_level,
        pnl = pos.profit,
        bid = details.market.bid,
        offer = details.market.offer,
        "position"
    );
}

pub fn log_working_order(details: &WorkingOrderDetails) {
    let order = &details.working_order_data;
    info!(
        deal_id = %order.deal_id,
        epic = %order.epic,
        direction = %order.direction,
        order_type = %order.type_,
        size = order.size,
        level = order.level,
        tif = %order.time_in_force,
        "working order"
    );
}

pub fn log_market(market: &Market) {
    info!(
        epic = %market.epic,
        name = %market.instrument_name,
        status = %market.market_status,
        bid = market.bid,
        offer = market.offer,
        spread = market.spread(),
        change_pct = market.percentage_change,
        "market"
    );
}

pub fn log_candles(epic: &str, candles: &[PricePoint]) {
    let Some(last) = candles.last() else {
        info!(epic = %epic, "no candles");
        return;
    };
    let high = candles
        .iter()
        .map(|c| c.high_price.bid)
        .fold(f64::MIN, f64::max);
    let low = candles
        .iter()
        .map(|c| c.low_price.bid)
        .fold(f64::MAX, f64::min);
    info!(
        epic = %epic,
        candles = candles.len(),
        last_time = %last.snapshot_time_utc,
        last_close = last.close_price.mid(),
        high_bid = high,
        low_bid = low,
        "candles"
    );
}

pub fn log_stream_summary(epic: &str, st: &EpicState) {
    info!(
        epic = %epic,
        quotes = st.quotes,
        bars = st.bars,
        last_bid = ?st.last_quote.as_ref().map(|q| q.bid),
        last_ofr = ?st.last_quote.as_ref().map(|q| q.ofr),
        min_spread = ?st.min_spread,
        max_spread = ?st.max_spread,
        last_close = ?st.last_bar.as_ref().map(|b| b.c),
        "stream summary"
    );
}
