//! Axum router and all HTTP handlers for fuse-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Paths come from configuration so tests can compose the
//! router with the defaults.
//!
//! Status mapping: client input errors are 400, any upstream failure is 502.
//! Both carry an [`ErrorResponse`] body.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use fuse_config::RoutePaths;
use fuse_md::{HistoricalPriceQuery, ProviderError, ResolveError};
use tracing::{info, warn};

use crate::{
    api_types::{ErrorResponse, HealthResponse, HistoricalParams, LastTradedParams},
    state::AppState,
};

const INVALID_INTERVAL: &str = "query.invalid_interval";

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>, paths: &RoutePaths) -> Router {
    let historical_slash = format!("{}/", paths.historical);
    Router::new()
        .route(&paths.health, get(health))
        .route(&paths.symbols, get(symbols))
        .route(&paths.last_traded, get(last_traded_price))
        .route(&paths.historical, get(historical_price))
        .route(&historical_slash, get(historical_price))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /iex/symbols
// ---------------------------------------------------------------------------

pub(crate) async fn symbols(State(st): State<Arc<AppState>>) -> Response {
    info!("symbols request");
    match st.market.all_symbols().await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => upstream_failure(&e),
    }
}

// ---------------------------------------------------------------------------
// GET /iex/lastTradedPrice?symbols=A,B
// ---------------------------------------------------------------------------

pub(crate) async fn last_traded_price(
    State(st): State<Arc<AppState>>,
    Query(params): Query<LastTradedParams>,
) -> Response {
    let wanted = params.symbol_list();
    info!(symbols = ?wanted, "last traded price request");
    match st.market.last_traded_prices(&wanted).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => upstream_failure(&e),
    }
}

// ---------------------------------------------------------------------------
// GET /iex/historicalPrice?symbol=..&date=..&range=..&from=..&to=..&interval=..
// ---------------------------------------------------------------------------

pub(crate) async fn historical_price(
    State(st): State<Arc<AppState>>,
    Query(params): Query<HistoricalParams>,
) -> Response {
    let query = match historical_query(params) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    info!(
        symbol = %query.symbol,
        date = ?query.date,
        range = ?query.range,
        interval_style = query.is_interval_style(),
        "historical price request"
    );

    match st.market.historical_prices(&query).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => resolve_failure(e),
    }
}

/// Raw params -> query. A blank `interval` is present without a value and
/// still selects the interval shape; anything else must be a non-negative
/// integer.
fn historical_query(p: HistoricalParams) -> Result<HistoricalPriceQuery, Response> {
    let interval_present = p.interval.is_some();
    let interval = match p.interval.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) => Some(n),
            Err(_) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    INVALID_INTERVAL,
                    format!("interval must be a non-negative integer, got {raw:?}"),
                ))
            }
        },
    };

    Ok(HistoricalPriceQuery {
        symbol: p.symbol.unwrap_or_default(),
        date: p.date,
        range: p.range,
        from: p.from,
        to: p.to,
        interval,
        interval_present,
    })
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn error_response(status: StatusCode, code: &str, error: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
        }),
    )
        .into_response()
}

fn resolve_failure(e: ResolveError) -> Response {
    match e {
        ResolveError::Query(q) => {
            info!(code = q.code(), "historical query rejected");
            error_response(StatusCode::BAD_REQUEST, q.code(), q.to_string())
        }
        ResolveError::Upstream(u) => upstream_failure(&u),
    }
}

fn upstream_failure(e: &ProviderError) -> Response {
    warn!(code = e.code(), error = %e, "upstream failure");
    error_response(StatusCode::BAD_GATEWAY, e.code(), e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_interval_is_present_without_value() {
        for raw in ["", " "] {
            let q = historical_query(HistoricalParams {
                symbol: Some("AAPL".into()),
                interval: Some(raw.into()),
                ..Default::default()
            })
            .unwrap();
            assert_eq!(q.interval, None, "interval={raw:?}");
            assert!(q.is_interval_style(), "interval={raw:?}");
        }
    }

    #[test]
    fn absent_interval_is_not_interval_style() {
        let q = historical_query(HistoricalParams {
            symbol: Some("AAPL".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(!q.interval_present);
        assert!(!q.is_interval_style());
    }

    #[test]
    fn numeric_interval_is_parsed() {
        let q = historical_query(HistoricalParams {
            symbol: Some("AAPL".into()),
            interval: Some("2".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(q.interval, Some(2));
    }

    #[test]
    fn non_numeric_interval_is_a_bad_request() {
        let resp = historical_query(HistoricalParams {
            symbol: Some("AAPL".into()),
            interval: Some("two".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_symbol_becomes_empty() {
        let q = historical_query(HistoricalParams::default()).unwrap();
        assert_eq!(q.symbol, "");
    }
}
