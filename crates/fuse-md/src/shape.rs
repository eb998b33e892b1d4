//! Endpoint selection for historical-price queries.
//!
//! [`select`] maps a validated [`HistoricalPriceQuery`] onto exactly one
//! [`ChartShape`]. Precedence is fixed and evaluated top to bottom:
//!
//! 1. any of `from` / `to` / `interval` present  -> [`ChartShape::BySymbolInterval`]
//! 2. `range` and `date` both non-blank          -> [`ChartShape::BySymbolRangeAndDate`]
//! 3. only `date` non-blank                      -> [`ChartShape::BySymbolAndDate`]
//! 4. only `range` non-blank                     -> [`ChartShape::BySymbolAndRange`]
//! 5. otherwise                                  -> [`ChartShape::BySymbol`]
//!
//! Selection is pure. It does not validate; run [`crate::query::validate`] first.

use std::fmt;

use crate::query::HistoricalPriceQuery;

/// Upstream query shape. One shape means one upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChartShape {
    BySymbol {
        symbol: String,
    },
    BySymbolAndRange {
        symbol: String,
        range: String,
    },
    BySymbolAndDate {
        symbol: String,
        date: String,
    },
    BySymbolRangeAndDate {
        symbol: String,
        range: String,
        date: String,
    },
    /// Sub-fields are passed through as supplied, empty strings included.
    BySymbolInterval {
        symbol: String,
        date: Option<String>,
        from: Option<String>,
        to: Option<String>,
        interval: Option<u32>,
    },
}

impl ChartShape {
    pub fn symbol(&self) -> &str {
        match self {
            ChartShape::BySymbol { symbol }
            | ChartShape::BySymbolAndRange { symbol, .. }
            | ChartShape::BySymbolAndDate { symbol, .. }
            | ChartShape::BySymbolRangeAndDate { symbol, .. }
            | ChartShape::BySymbolInterval { symbol, .. } => symbol,
        }
    }

    /// Short tag used in logs and tests.
    pub fn tag(&self) -> &'static str {
        match self {
            ChartShape::BySymbol { .. } => "by_symbol",
            ChartShape::BySymbolAndRange { .. } => "by_symbol_and_range",
            ChartShape::BySymbolAndDate { .. } => "by_symbol_and_date",
            ChartShape::BySymbolRangeAndDate { .. } => "by_symbol_range_and_date",
            ChartShape::BySymbolInterval { .. } => "by_symbol_interval",
        }
    }
}

impl fmt::Display for ChartShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.tag(), self.symbol())
    }
}

/// Choose the single upstream shape for `query`.
pub fn select(query: &HistoricalPriceQuery) -> ChartShape {
    let symbol = query.symbol.trim().to_ascii_uppercase();

    if query.is_interval_style() {
        return ChartShape::BySymbolInterval {
            symbol,
            date: query.date.clone(),
            from: query.from.clone(),
            to: query.to.clone(),
            interval: query.interval,
        };
    }

    match (non_blank(&query.range), non_blank(&query.date)) {
        (Some(range), Some(date)) => ChartShape::BySymbolRangeAndDate {
            symbol,
            range: range.to_string(),
            date: date.to_string(),
        },
        (None, Some(date)) => ChartShape::BySymbolAndDate {
            symbol,
            date: date.to_string(),
        },
        (Some(range), None) => ChartShape::BySymbolAndRange {
            symbol,
            range: range.to_string(),
        },
        (None, None) => ChartShape::BySymbol { symbol },
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
