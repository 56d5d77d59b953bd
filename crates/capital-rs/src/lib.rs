//! Capital.com Rust SDK
//!
//! Unofficial Rust SDK for the Capital.com trading API.
//! Provides session management with encrypted login, account, market data,
//! trading and watchlist endpoints, and a streaming client for live quotes.
//!
//! # Quick Start
//!
//! ```no_run
//! use capital_rs::{CapitalClient, Configuration};
//! use capital_rs::markets::models::{PricesQuery, Resolution};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // 1. Configure the client (demo environment)
//! let client = CapitalClient::new(Configuration::new("your-api-key", true))?;
//!
//! // 2. Log in; the password is encrypted before it is sent
//! client.login("me@example.com", "password", false).await?;
//!
//! // 3. Use the client to call API endpoints
//! let prices = client.get_prices("GOLD", &PricesQuery {
//!     resolution: Resolution::Hour,
//!     max: Some(24),
//!     ..Default::default()
//! }).await?;
//!
//! println!("Got {} candles", prices.prices.len());
//! client.logout().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Main Components
//!
//! - [`CapitalClient`] - Main client with all API endpoint methods
//! - [`Configuration`] - API key, environment and transport options
//! - [`CapitalWebsocketClient`] - Streaming quotes and OHLC bars
//!
//! # API Endpoint Modules
//!
//! - [`account`] - Accounts and preferences
//! - [`markets`] - Market search, details, prices, navigation, sentiment
//! - [`trading`] - Positions, working orders, confirmations, history
//! - [`watchlists`] - Watchlists and their markets
//!
//! # Finding Endpoint Methods
//!
//! All API endpoint methods are implemented on [`CapitalClient`].
//! Navigate to the [`CapitalClient`] documentation to see all available methods organized by category.


// Core modules
pub mod auth;           // Session lifecycle and password encryption
pub mod client;         // Main HTTP client
pub mod clock;          // Time source for session expiry
pub mod config;         // Environment and transport options
pub mod ws_client;      // Main Websocket client
pub mod errors;         // Error types
pub mod transport;      // HTTP transport and auth headers
pub(crate) mod helpers; // Internal HTTP helpers


// API endpoint modules
pub mod account;        // Accounts and preferences
pub mod markets;        // Market data
pub mod trading;        // Positions and orders
pub mod watchlists;     // Watchlists
pub mod websocket;      // Websocket quotes and OHLC updates


// Re-exports for convenient access
pub use client::CapitalClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Configuration, Environment, TransportOptions};
pub use errors::{CapitalError, ErrorKind};
pub use transport::AuthTokens;
pub use ws_client::CapitalWebsocketClient;
