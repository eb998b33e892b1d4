//! Market-data service facade used by the HTTP layer.
//!
//! Symbol listing and last-trade lookups forward 1:1 to the provider. Historical
//! prices go through [`HistoricalResolver`].

use std::sync::Arc;

use tracing::debug;

use crate::provider::{MarketDataProvider, ProviderError};
use crate::query::HistoricalPriceQuery;
use crate::record::{HistoricalPrice, LastTradedPrice, SymbolRecord};
use crate::resolver::{HistoricalResolver, ResolveError};

#[derive(Clone)]
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
    resolver: HistoricalResolver,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            resolver: HistoricalResolver::new(Arc::clone(&provider)),
            provider,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.provider.source_name()
    }

    pub async fn all_symbols(&self) -> Result<Vec<SymbolRecord>, ProviderError> {
        self.provider.fetch_symbols().await
    }

    /// Blank entries are dropped. Nothing left means an empty answer and no
    /// upstream call.
    pub async fn last_traded_prices(
        &self,
        symbols: &[String],
    ) -> Result<Vec<LastTradedPrice>, ProviderError> {
        let wanted: Vec<String> = symbols
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if wanted.is_empty() {
            debug!("last traded: no symbols requested");
            return Ok(Vec::new());
        }
        self.provider.fetch_last_traded(&wanted).await
    }

    pub async fn historical_prices(
        &self,
        query: &HistoricalPriceQuery,
    ) -> Result<Vec<HistoricalPrice>, ResolveError> {
        self.resolver.resolve(query).await
    }

    pub fn resolver(&self) -> &HistoricalResolver {
        &self.resolver
    }
}
