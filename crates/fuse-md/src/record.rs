//! Wire and output records.
//!
//! Upstream rows are deserialized leniently (unknown fields ignored). Prices are
//! `Decimal` end to end and leave the gateway as JSON numbers.

use chrono::TimeZone;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::date::{normalize_in, DateError, RawDate};

// ---------------------------------------------------------------------------
// Historical prices
// ---------------------------------------------------------------------------

/// One upstream chart row, date not yet normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPriceRecord {
    #[serde(default)]
    pub symbol: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Missing or `null` reads as zero.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub volume: u64,
    pub date: RawDate,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

/// One trading day as returned to callers. `date` is always `YYYY-MM-DD`
/// unless upstream already sent a formatted string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalPrice {
    pub symbol: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
    pub date: String,
}

impl RawPriceRecord {
    /// Replace the raw date with its canonical form. Every other field is
    /// carried over unchanged.
    pub fn normalize_in<Tz: TimeZone>(self, tz: &Tz) -> Result<HistoricalPrice, DateError> {
        let date = normalize_in(&self.date, tz)?;
        Ok(HistoricalPrice {
            symbol: self.symbol,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            date,
        })
    }
}

// ---------------------------------------------------------------------------
// Reference data / last trade
// ---------------------------------------------------------------------------

/// Entry of the upstream symbol universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRecord {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub is_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastTradedPrice {
    pub symbol: String,
    pub price: Decimal,
    #[serde(default)]
    pub size: u64,
    /// Epoch millis of the trade, as sent upstream.
    #[serde(default)]
    pub time: i64,
}
