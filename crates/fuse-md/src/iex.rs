//! IEX Cloud HTTP provider.
//!
//! Maps each [`ChartShape`] to exactly one `GET` against the IEX REST API and
//! decodes the JSON body. The token is appended as a query parameter when
//! configured and never appears in logs or error messages.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::provider::{MarketDataProvider, ProviderError};
use crate::record::{LastTradedPrice, RawPriceRecord, SymbolRecord};
use crate::shape::ChartShape;

pub const DEFAULT_BASE_URL: &str = "https://cloud.iexapis.com/stable";

/// Longest upstream error body echoed back in [`ProviderError::Api`].
const MAX_ERROR_BODY: usize = 200;

#[derive(Clone)]
pub struct IexHttpProvider {
    token: Option<String>,
    http: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for IexHttpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IexHttpProvider")
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl IexHttpProvider {
    pub fn new(token: Option<String>) -> Self {
        Self::new_with_base_url(token, DEFAULT_BASE_URL.to_string())
    }

    pub fn new_with_base_url(token: Option<String>, base_url: String) -> Self {
        Self {
            token,
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Rebuild the HTTP client with a whole-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ProviderError> {
        self.http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(format!("http client build failed: {e}")))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        debug!(source = self.source_name(), %url, ?params, "upstream request");

        let mut req = self.http.get(&url).query(params);
        if let Some(token) = &self.token {
            req = req.query(&[("token", token.as_str())]);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            warn!(source = self.source_name(), path, "upstream not found");
            return Err(ProviderError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                source = self.source_name(),
                path,
                status = status.as_u16(),
                "upstream http error"
            );
            return Err(ProviderError::Api {
                code: Some(status.as_u16()),
                message: truncate(body.trim(), MAX_ERROR_BODY),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::Decode(format!("{path}: {e}")))
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for IexHttpProvider {
    fn source_name(&self) -> &'static str {
        "iex"
    }

    async fn fetch_symbols(&self) -> Result<Vec<SymbolRecord>, ProviderError> {
        self.get_json("ref-data/symbols", &[]).await
    }

    async fn fetch_last_traded(
        &self,
        symbols: &[String],
    ) -> Result<Vec<LastTradedPrice>, ProviderError> {
        self.get_json("tops/last", &[("symbols", symbols.join(","))])
            .await
    }

    async fn fetch_historical(
        &self,
        shape: &ChartShape,
    ) -> Result<Vec<RawPriceRecord>, ProviderError> {
        let (path, params) = chart_request(shape);
        self.get_json(&path, &params).await
    }
}

// ---------------------------------------------------------------------------
// Shape -> request
// ---------------------------------------------------------------------------

/// Relative path and query parameters for one chart shape.
pub(crate) fn chart_request(shape: &ChartShape) -> (String, Vec<(&'static str, String)>) {
    match shape {
        ChartShape::BySymbol { symbol } => (format!("stock/{}/chart", enc(symbol)), Vec::new()),
        ChartShape::BySymbolAndRange { symbol, range } => (
            format!("stock/{}/chart/{}", enc(symbol), enc(range)),
            Vec::new(),
        ),
        ChartShape::BySymbolAndDate { symbol, date } => (
            format!("stock/{}/chart/date/{}", enc(symbol), enc(date)),
            Vec::new(),
        ),
        ChartShape::BySymbolRangeAndDate {
            symbol,
            range,
            date,
        } => (
            format!("stock/{}/chart/{}/{}", enc(symbol), enc(range), enc(date)),
            Vec::new(),
        ),
        ChartShape::BySymbolInterval {
            symbol,
            date,
            from,
            to,
            interval,
        } => {
            let mut params = Vec::new();
            if let Some(d) = date {
                params.push(("on", d.clone()));
            }
            if let Some(f) = from {
                params.push(("from", f.clone()));
            }
            if let Some(t) = to {
                params.push(("to", t.clone()));
            }
            if let Some(n) = interval {
                params.push(("interval", n.to_string()));
            }
            (
                format!("time-series/HISTORICAL_PRICES/{}", enc(symbol)),
                params,
            )
        }
    }
}

fn enc(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
