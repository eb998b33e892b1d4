//! Historical-price resolver.
//!
//! Validate (fail fast, no upstream call) -> select one [`ChartShape`] ->
//! one provider round trip -> normalize every row's date. Row order is the
//! upstream order. No retry and no fallback to another shape.

use std::fmt;
use std::sync::Arc;

use chrono::{Local, TimeZone};
use tracing::{debug, warn};

use crate::date::DateError;
use crate::provider::{MarketDataProvider, ProviderError};
use crate::query::{validate, HistoricalPriceQuery, QueryError};
use crate::record::HistoricalPrice;
use crate::shape::select;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Client input error. Upstream was not contacted.
    Query(QueryError),
    /// Failure reported by the provider, or an undecodable row date.
    Upstream(ProviderError),
}

impl ResolveError {
    /// True for errors the caller caused (HTTP 4xx class).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ResolveError::Query(_))
    }

    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::Query(e) => e.code(),
            ResolveError::Upstream(e) => e.code(),
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Query(e) => write!(f, "invalid query: {e}"),
            ResolveError::Upstream(e) => write!(f, "upstream error: {e}"),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Query(e) => Some(e),
            ResolveError::Upstream(e) => Some(e),
        }
    }
}

impl From<QueryError> for ResolveError {
    fn from(e: QueryError) -> Self {
        ResolveError::Query(e)
    }
}

impl From<ProviderError> for ResolveError {
    fn from(e: ProviderError) -> Self {
        ResolveError::Upstream(e)
    }
}

impl From<DateError> for ResolveError {
    fn from(e: DateError) -> Self {
        ResolveError::Upstream(ProviderError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Stateless apart from the shared provider handle; safe to call concurrently.
#[derive(Clone)]
pub struct HistoricalResolver {
    provider: Arc<dyn MarketDataProvider>,
}

impl HistoricalResolver {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Resolve with dates rendered in the host's local zone.
    pub async fn resolve(
        &self,
        query: &HistoricalPriceQuery,
    ) -> Result<Vec<HistoricalPrice>, ResolveError> {
        self.resolve_in(query, &Local).await
    }

    /// Resolve with dates rendered in `tz`.
    pub async fn resolve_in<Tz>(
        &self,
        query: &HistoricalPriceQuery,
        tz: &Tz,
    ) -> Result<Vec<HistoricalPrice>, ResolveError>
    where
        Tz: TimeZone + Sync,
    {
        validate(query)?;

        let shape = select(query);
        debug!(source = self.provider.source_name(), %shape, "historical shape selected");

        let rows = self.provider.fetch_historical(&shape).await.map_err(|e| {
            warn!(source = self.provider.source_name(), %shape, error = %e, "historical fetch failed");
            e
        })?;

        let out = rows
            .into_iter()
            .map(|row| row.normalize_in(tz))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(out)
    }
}
