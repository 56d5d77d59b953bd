use serde::Serialize;

use crate::errors::CapitalError;
use crate::markets::models::Resolution;
use crate::websocket::models::{MarketDataPayload, OhlcPayload, OutboundMessage};
use crate::CapitalWebsocketClient;

const MARKET_DATA_SUBSCRIBE: &str = "marketData.subscribe";
const MARKET_DATA_UNSUBSCRIBE: &str = "marketData.unsubscribe";
const OHLC_SUBSCRIBE: &str = "OHLCMarketData.subscribe";
const OHLC_UNSUBSCRIBE: &str = "OHLCMarketData.unsubscribe";
const PING: &str = "ping";

impl CapitalWebsocketClient {
    /// Start receiving `quote` messages for `epics`.
    pub async fn subscribe_market_data(&self, epics: &[&str]) -> Result<(), CapitalError> {
        let id = self.get_correlation_id().to_string();
        let msg = self.envelope(MARKET_DATA_SUBSCRIBE, id, Some(market_data_payload(epics)))?;
        self.send_message(msg).await
    }

    pub async fn unsubscribe_market_data(&self, epics: &[&str]) -> Result<(), CapitalError> {
        let id = self.get_correlation_id().to_string();
        let msg = self.envelope(MARKET_DATA_UNSUBSCRIBE, id, Some(market_data_payload(epics)))?;
        self.send_message(msg).await
    }

    /// Start receiving `ohlc.event` bars. `bar_type` is `classic` or `heikin-ashi`.
    pub async fn subscribe_ohlc(
        &self,
        epics: &[&str],
        resolutions: &[Resolution],
        bar_type: &str,
    ) -> Result<(), CapitalError> {
        let id = self.get_correlation_id().to_string();
        let payload = ohlc_payload(epics, resolutions, bar_type);
        let msg = self.envelope(OHLC_SUBSCRIBE, id, Some(payload))?;
        self.send_message(msg).await
    }

    pub async fn unsubscribe_ohlc(
        &self,
        epics: &[&str],
        resolutions: &[Resolution],
        bar_type: &str,
    ) -> Result<(), CapitalError> {
        let id = self.get_correlation_id().to_string();
        let payload = ohlc_payload(epics, resolutions, bar_type);
        let msg = self.envelope(OHLC_UNSUBSCRIBE, id, Some(payload))?;
        self.send_message(msg).await
    }

    /// Keeps the stream alive. Uses a random correlation id.
    pub async fn ping(&self) -> Result<(), CapitalError> {
        let id = uuid::Uuid::new_v4().to_string();
        let msg = self.envelope::<()>(PING, id, None)?;
        self.send_message(msg).await
    }

    fn envelope<P: Serialize>(
        &self,
        destination: &str,
        correlation_id: String,
        payload: Option<P>,
    ) -> Result<String, CapitalError> {
        let tokens = self.credentials();
        let message = OutboundMessage {
            destination,
            correlation_id,
            cst: &tokens.cst,
            security_token: &tokens.security_token,
            payload,
        };
        Ok(serde_json::to_string(&message)?)
    }
}

fn market_data_payload(epics: &[&str]) -> MarketDataPayload {
    MarketDataPayload {
        epics: epics.iter().map(|e| e.to_string()).collect(),
    }
}

fn ohlc_payload(epics: &[&str], resolutions: &[Resolution], bar_type: &str) -> OhlcPayload {
    OhlcPayload {
        epics: epics.iter().map(|e| e.to_string()).collect(),
        resolutions: resolutions.to_vec(),
        bar_type: bar_type.to_string(),
    }
}
