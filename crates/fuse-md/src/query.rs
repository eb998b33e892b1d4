//! Historical-price query model and parameter validation.
//!
//! A [`HistoricalPriceQuery`] is built once per request from the raw
//! parameters and checked by [`validate`] before any upstream call is made.
//!
//! Validation only rejects malformed individual parameters. It never rejects a
//! combination as "too many": precedence between `date`, `range` and the
//! interval fields is decided later by [`crate::shape::select`].

use std::fmt;

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Raw parameters of one historical-price request.
///
/// `Some("")` and `None` are different inputs: an explicitly empty `range` or
/// `date` is a client error, an absent one is not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoricalPriceQuery {
    /// Ticker, case-insensitive. Required and non-blank.
    pub symbol: String,
    /// Single trading date in provider-native form (e.g. `"20220104"`).
    pub date: Option<String>,
    /// Relative lookback token (e.g. `"6m"`), forwarded verbatim.
    pub range: Option<String>,
    /// Inclusive interval start. Only meaningful for the interval shape.
    pub from: Option<String>,
    /// Inclusive interval end. Only meaningful for the interval shape.
    pub to: Option<String>,
    /// Sampling stride (every n-th record). Only meaningful with `from`/`to`.
    pub interval: Option<u32>,
    /// `interval` appeared in the request, possibly as an empty string.
    pub interval_present: bool,
}

impl HistoricalPriceQuery {
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self.interval_present = true;
        self
    }

    /// Mark `interval` as supplied without a value (`interval=`).
    pub fn with_empty_interval(mut self) -> Self {
        self.interval = None;
        self.interval_present = true;
        self
    }

    /// True when any of `from`, `to` or `interval` was supplied at all,
    /// including as an empty string.
    pub fn is_interval_style(&self) -> bool {
        self.from.is_some()
            || self.to.is_some()
            || self.interval_present
            || self.interval.is_some()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Client input errors. Detected before any upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// `symbol` is empty or whitespace only.
    InvalidSymbol,
    /// `range` was supplied as an empty string.
    EmptyRange,
    /// `date` was supplied as an empty string.
    EmptyDate,
}

impl QueryError {
    /// Stable machine-readable code surfaced to HTTP callers.
    pub const fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidSymbol => "query.invalid_symbol",
            QueryError::EmptyRange => "query.empty_range",
            QueryError::EmptyDate => "query.empty_date",
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidSymbol => write!(f, "symbol must be provided and non-blank"),
            QueryError::EmptyRange => write!(f, "range was provided but is empty"),
            QueryError::EmptyDate => write!(f, "date was provided but is empty"),
        }
    }
}

impl std::error::Error for QueryError {}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Check a query and return the first failure.
///
/// Order is fixed: `InvalidSymbol`, then `EmptyRange`, then `EmptyDate`.
pub fn validate(query: &HistoricalPriceQuery) -> Result<(), QueryError> {
    if query.symbol.trim().is_empty() {
        return Err(QueryError::InvalidSymbol);
    }
    if query.range.as_deref() == Some("") {
        return Err(QueryError::EmptyRange);
    }
    if query.date.as_deref() == Some("") {
        return Err(QueryError::EmptyDate);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_only_is_valid() {
        assert_eq!(validate(&HistoricalPriceQuery::for_symbol("AAPL")), Ok(()));
    }

    #[test]
    fn blank_symbol_is_invalid() {
        for s in ["", " ", "\t\n"] {
            let q = HistoricalPriceQuery::for_symbol(s);
            assert_eq!(validate(&q), Err(QueryError::InvalidSymbol), "symbol={s:?}");
        }
    }

    #[test]
    fn invalid_symbol_wins_over_other_failures() {
        let q = HistoricalPriceQuery::for_symbol("")
            .with_range("")
            .with_date("");
        assert_eq!(validate(&q), Err(QueryError::InvalidSymbol));
    }

    #[test]
    fn empty_range_rejected_but_absent_range_accepted() {
        let q = HistoricalPriceQuery::for_symbol("AAPL").with_range("");
        assert_eq!(validate(&q), Err(QueryError::EmptyRange));

        let q = HistoricalPriceQuery::for_symbol("AAPL").with_date("20220104");
        assert_eq!(validate(&q), Ok(()));
    }

    #[test]
    fn empty_range_reported_before_empty_date() {
        let q = HistoricalPriceQuery::for_symbol("AAPL")
            .with_range("")
            .with_date("");
        assert_eq!(validate(&q), Err(QueryError::EmptyRange));
    }

    #[test]
    fn empty_date_rejected() {
        let q = HistoricalPriceQuery::for_symbol("AAPL")
            .with_range("6m")
            .with_date("");
        assert_eq!(validate(&q), Err(QueryError::EmptyDate));
    }

    #[test]
    fn whitespace_range_is_not_empty() {
        // Only the exact empty string is rejected; blank values fall through
        // to the selector, which treats them as absent.
        let q = HistoricalPriceQuery::for_symbol("AAPL").with_range("  ");
        assert_eq!(validate(&q), Ok(()));
    }

    #[test]
    fn every_parameter_at_once_is_valid() {
        let q = HistoricalPriceQuery::for_symbol("AAPL")
            .with_range("6m")
            .with_date("20220104")
            .with_from("20220101")
            .with_to("20220201")
            .with_interval(2);
        assert_eq!(validate(&q), Ok(()));
    }

    #[test]
    fn empty_interval_bounds_are_not_validator_failures() {
        let q = HistoricalPriceQuery::for_symbol("AAPL").with_from("").with_to("");
        assert_eq!(validate(&q), Ok(()));
        assert!(q.is_interval_style());
    }

    #[test]
    fn empty_interval_still_counts_as_interval_style() {
        let q = HistoricalPriceQuery::for_symbol("AAPL").with_empty_interval();
        assert_eq!(validate(&q), Ok(()));
        assert_eq!(q.interval, None);
        assert!(q.is_interval_style());
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(QueryError::InvalidSymbol.code(), "query.invalid_symbol");
        assert_eq!(QueryError::EmptyRange.code(), "query.empty_range");
        assert_eq!(QueryError::EmptyDate.code(), "query.empty_date");
    }
}
