//! Request and response types for the gateway HTTP endpoints.
//!
//! Price and symbol payloads are the `fuse-md` record types serialized as-is.
//! No business logic lives here.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Errors (400 / 502)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Stable machine-readable code, e.g. "query.empty_range" or "upstream.not_found".
    pub code: String,
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

/// `?symbols=AAPL,MSFT`. Absent and empty both mean "no symbols".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LastTradedParams {
    pub symbols: Option<String>,
}

impl LastTradedParams {
    pub fn symbol_list(&self) -> Vec<String> {
        self.symbols
            .as_deref()
            .map(|s| s.split(',').map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Historical-price parameters as they arrive. `Some("")` is kept distinct
/// from `None` so `range=` and `date=` can be rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoricalParams {
    pub symbol: Option<String>,
    pub date: Option<String>,
    pub range: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Parsed to an integer by the handler; non-integers are a 400.
    pub interval: Option<String>,
}
