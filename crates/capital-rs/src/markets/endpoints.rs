//! Markets module endpoints.
//!
//! This module implements API endpoints for retrieving market data from
//! Capital.com, including search, market details, historical prices, the
//! navigation tree and client sentiment.
//!
//! # Usage
//!
//! All endpoint methods are available on [`CapitalClient`](crate::client::CapitalClient).
//! See the client documentation for a complete list of available methods.

use crate::client::CapitalClient;
use crate::errors::CapitalError;
use crate::helpers::{join_csv, parse_json, with_query, with_segment};
use crate::markets::models::{
    ClientSentiment, ClientSentimentResponse, GetMarketsResponse, MarketDetails,
    MarketNavigation, MarketsQuery, PricesQuery, PricesResponse, SentimentQuery, ServerTime,
};

const GET_TIME: &str = "/time";
const GET_MARKETS: &str = "/markets";
const GET_MARKET: &str = "/markets/{}";
const GET_PRICES: &str = "/prices/{}";
const GET_MARKET_NAVIGATION: &str = "/marketnavigation";
const GET_MARKET_NAVIGATION_NODE: &str = "/marketnavigation/{}";
const GET_CLIENT_SENTIMENT: &str = "/clientsentiment";
const GET_MARKET_CLIENT_SENTIMENT: &str = "/clientsentiment/{}";

impl CapitalClient {
    /// Get server time.
    ///
    /// **Endpoint:** `GET /time`
    pub async fn get_server_time(&self) -> Result<ServerTime, CapitalError> {
        let resp = self.authenticated_get(GET_TIME).await?;
        parse_json(&resp)
    }


    /// Search markets by name and/or fetch specific epics.
    ///
    /// **Endpoint:** `GET /markets`
    ///
    /// # Query Parameters
    /// - `searchTerm` - Free text matched against market names
    /// - `epics` - Comma separated list of epics
    ///
    /// # Returns
    /// [`GetMarketsResponse`] with the matching markets
    pub async fn search_markets(
        &self,
        search_term: Option<&str>,
        epics: Option<&[&str]>,
    ) -> Result<GetMarketsResponse, CapitalError> {
        let params = MarketsQuery {
            search_term: search_term.map(str::to_string),
            epics: epics.map(join_csv),
        };
        let url = with_query(GET_MARKETS, &params)?;
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }


    /// Get details for a single market.
    ///
    /// **Endpoint:** `GET /markets/{epic}`
    ///
    /// # Returns
    /// [`MarketDetails`] with instrument, dealing rules and snapshot
    pub async fn get_market(&self, epic: &str) -> Result<MarketDetails, CapitalError> {
        let url = with_segment(GET_MARKET, epic);
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }


    /// Historical prices for a market.
    ///
    /// **Endpoint:** `GET /prices/{epic}`
    ///
    /// # Query Parameters
    /// - `resolution` - MINUTE, MINUTE_5, MINUTE_15, MINUTE_30, HOUR, HOUR_4, DAY, WEEK
    /// - `max` - Maximum number of price points
    /// - `from` / `to` - ISO 8601 date bounds
    pub async fn get_prices(
        &self,
        epic: &str,
        params: &PricesQuery,
    ) -> Result<PricesResponse, CapitalError> {
        let url = with_query(&with_segment(GET_PRICES, epic), params)?;
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }


    /// Top level of the market navigation tree.
    ///
    /// **Endpoint:** `GET /marketnavigation`
    pub async fn get_market_navigation(&self) -> Result<MarketNavigation, CapitalError> {
        let resp = self.authenticated_get(GET_MARKET_NAVIGATION).await?;
        parse_json(&resp)
    }


    /// Children (or markets) under a navigation node.
    ///
    /// **Endpoint:** `GET /marketnavigation/{nodeId}`
    pub async fn get_market_navigation_node(
        &self,
        node_id: &str,
    ) -> Result<MarketNavigation, CapitalError> {
        let url = with_segment(GET_MARKET_NAVIGATION_NODE, node_id);
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }


    /// Long/short split of client positions.
    ///
    /// **Endpoint:** `GET /clientsentiment`
    pub async fn get_client_sentiment(
        &self,
        market_ids: Option<&[&str]>,
    ) -> Result<ClientSentimentResponse, CapitalError> {
        let params = SentimentQuery {
            market_ids: market_ids.map(join_csv),
        };
        let url = with_query(GET_CLIENT_SENTIMENT, &params)?;
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }


    /// **Endpoint:** `GET /clientsentiment/{marketId}`
    pub async fn get_market_client_sentiment(
        &self,
        market_id: &str,
    ) -> Result<ClientSentiment, CapitalError> {
        let url = with_segment(GET_MARKET_CLIENT_SENTIMENT, market_id);
        let resp = self.authenticated_get(&url).await?;
        parse_json(&resp)
    }
}
