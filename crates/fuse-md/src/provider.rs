//! Upstream market-data provider boundary.
//!
//! This module defines **only** the provider trait and its error type.
//! No URL building, no date normalization and no validation belong here;
//! see [`crate::iex`] for the HTTP implementation and [`crate::resolver`]
//! for the historical-price pipeline.

use std::fmt;

use crate::record::{LastTradedPrice, RawPriceRecord, SymbolRecord};
use crate::shape::ChartShape;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that a [`MarketDataProvider`] implementation may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network or transport failure.
    Transport(String),
    /// The upstream API answered with a non-success status.
    Api { code: Option<u16>, message: String },
    /// The upstream API does not know the requested symbol or resource.
    NotFound(String),
    /// A response payload could not be decoded.
    Decode(String),
}

impl ProviderError {
    pub const fn code(&self) -> &'static str {
        match self {
            ProviderError::Transport(_) => "upstream.transport",
            ProviderError::Api { .. } => "upstream.api",
            ProviderError::NotFound(_) => "upstream.not_found",
            ProviderError::Decode(_) => "upstream.decode",
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(msg) => write!(f, "transport error: {msg}"),
            ProviderError::Api {
                code: Some(c),
                message,
            } => write!(f, "provider api error code={c}: {message}"),
            ProviderError::Api {
                code: None,
                message,
            } => write!(f, "provider api error: {message}"),
            ProviderError::NotFound(what) => write!(f, "not found upstream: {what}"),
            ProviderError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Upstream market-data provider contract.
///
/// Object safe and `Send + Sync` so the daemon can share one
/// `Arc<dyn MarketDataProvider>` across handlers.
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name identifying this provider (e.g. `"iex"`).
    fn source_name(&self) -> &'static str;

    /// Full symbol universe.
    async fn fetch_symbols(&self) -> Result<Vec<SymbolRecord>, ProviderError>;

    /// Last trade for each symbol. `symbols` is never empty.
    async fn fetch_last_traded(
        &self,
        symbols: &[String],
    ) -> Result<Vec<LastTradedPrice>, ProviderError>;

    /// Exactly one upstream round trip for `shape`. Rows come back in upstream
    /// order with raw dates.
    async fn fetch_historical(
        &self,
        shape: &ChartShape,
    ) -> Result<Vec<RawPriceRecord>, ProviderError>;
}
