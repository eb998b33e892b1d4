//! Date normalizer for upstream price records.
//!
//! Upstream rows carry their date either as epoch milliseconds (JSON integer or
//! an all-digit string, optionally signed) or as an already formatted string. The representation
//! is decided once, at deserialization, into [`RawDate`].
//!
//! - `Epoch(ms)`: rendered as a calendar date in the host's local zone, then
//!   moved forward exactly one day, formatted `YYYY-MM-DD`.
//! - `Formatted(s)`: returned unchanged. No correction is applied.
//!
//! The one-day shift compensates for upstream timestamps that mark midnight UTC
//! of the trading day, which land on the previous day west of UTC. The result
//! therefore depends on the host zone; [`normalize_in`] takes the zone
//! explicitly so tests can pin it.

use std::fmt;

use chrono::{DateTime, Days, Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Upstream date representation, parsed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    Epoch(i64),
    Formatted(String),
}

impl RawDate {
    /// Classify a textual date. All-digit strings, with an optional leading
    /// `-`, are epoch milliseconds.
    pub fn parse(raw: &str) -> Result<Self, DateError> {
        let digits = raw.strip_prefix('-').unwrap_or(raw);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let ms = raw
                .parse::<i64>()
                .map_err(|_| DateError::NotAnEpoch(raw.to_string()))?;
            Ok(RawDate::Epoch(ms))
        } else {
            Ok(RawDate::Formatted(raw.to_string()))
        }
    }
}

impl<'de> Deserialize<'de> for RawDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Int(i64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Int(ms) => Ok(RawDate::Epoch(ms)),
            Wire::Text(s) => RawDate::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

impl Serialize for RawDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawDate::Epoch(ms) => serializer.serialize_i64(*ms),
            RawDate::Formatted(s) => serializer.serialize_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// All-digit string that does not fit in an i64.
    NotAnEpoch(String),
    /// Epoch outside the representable calendar range.
    OutOfRange(i64),
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::NotAnEpoch(s) => write!(f, "numeric date does not fit epoch millis: {s}"),
            DateError::OutOfRange(ms) => write!(f, "epoch millis out of calendar range: {ms}"),
        }
    }
}

impl std::error::Error for DateError {}

/// Canonical date using the host's default zone at call time.
pub fn normalize(raw: &RawDate) -> Result<String, DateError> {
    normalize_in(raw, &Local)
}

/// Canonical date using an explicit zone.
pub fn normalize_in<Tz: TimeZone>(raw: &RawDate, tz: &Tz) -> Result<String, DateError> {
    match raw {
        RawDate::Formatted(s) => Ok(s.clone()),
        RawDate::Epoch(ms) => {
            let utc = DateTime::from_timestamp_millis(*ms).ok_or(DateError::OutOfRange(*ms))?;
            let shifted = utc
                .with_timezone(tz)
                .date_naive()
                .checked_add_days(Days::new(1))
                .ok_or(DateError::OutOfRange(*ms))?;
            Ok(shifted.format(CANONICAL_FORMAT).to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::{America::New_York, Asia::Tokyo};

    // Midnight UTC of the named day.
    const MAY_24_2022: i64 = 1_653_350_400_000;
    const JAN_04_2022: i64 = 1_641_254_400_000;
    const DEC_31_2021: i64 = 1_640_908_800_000;

    #[test]
    fn epoch_west_of_utc_lands_on_trading_day() {
        // 2022-05-23 20:00 EDT locally, shifted forward to the trading day.
        let out = normalize_in(&RawDate::Epoch(MAY_24_2022), &New_York).unwrap();
        assert_eq!(out, "2022-05-24");

        let out = normalize_in(&RawDate::Epoch(JAN_04_2022), &New_York).unwrap();
        assert_eq!(out, "2022-01-04");
    }

    #[test]
    fn shift_is_unconditional_east_of_utc() {
        // Upstream format dependency: an east-of-UTC host reports the day after
        // the trading day. A change to UTC-correct upstream dates breaks this.
        let out = normalize_in(&RawDate::Epoch(MAY_24_2022), &Tokyo).unwrap();
        assert_eq!(out, "2022-05-25");

        let out = normalize_in(&RawDate::Epoch(MAY_24_2022), &Utc).unwrap();
        assert_eq!(out, "2022-05-25");
    }

    #[test]
    fn shift_crosses_year_boundary() {
        let out = normalize_in(&RawDate::Epoch(DEC_31_2021), &New_York).unwrap();
        assert_eq!(out, "2021-12-31");

        let out = normalize_in(&RawDate::Epoch(DEC_31_2021), &Utc).unwrap();
        assert_eq!(out, "2022-01-01");
    }

    #[test]
    fn host_zone_result_is_one_day_after_local_conversion() {
        for ms in [MAY_24_2022, JAN_04_2022, DEC_31_2021, 0] {
            let local = DateTime::from_timestamp_millis(ms)
                .unwrap()
                .with_timezone(&Local)
                .date_naive();
            let expected = (local + Days::new(1)).format("%Y-%m-%d").to_string();
            assert_eq!(normalize(&RawDate::Epoch(ms)).unwrap(), expected, "ms={ms}");
        }
    }

    #[test]
    fn formatted_dates_pass_through_unchanged() {
        for s in ["2022-05-24", "May 24, 2022", "", "2022-05-24T00:00:00Z"] {
            let raw = RawDate::Formatted(s.to_string());
            assert_eq!(normalize(&raw).unwrap(), s);
            assert_eq!(normalize_in(&raw, &Tokyo).unwrap(), s);
        }
    }

    #[test]
    fn out_of_range_epoch_is_an_error() {
        let err = normalize_in(&RawDate::Epoch(i64::MAX), &Utc).unwrap_err();
        assert_eq!(err, DateError::OutOfRange(i64::MAX));
    }

    #[test]
    fn parse_classifies_digits_as_epoch() {
        assert_eq!(RawDate::parse("1653350400000").unwrap(), RawDate::Epoch(MAY_24_2022));
        assert_eq!(
            RawDate::parse("2022-05-24").unwrap(),
            RawDate::Formatted("2022-05-24".to_string())
        );
        assert_eq!(RawDate::parse("").unwrap(), RawDate::Formatted(String::new()));
        assert!(matches!(
            RawDate::parse("99999999999999999999999"),
            Err(DateError::NotAnEpoch(_))
        ));
    }

    #[test]
    fn signed_epoch_string_matches_signed_number() {
        let from_text: RawDate = serde_json::from_str("\"-86400000\"").unwrap();
        let from_number: RawDate = serde_json::from_str("-86400000").unwrap();
        assert_eq!(from_text, RawDate::Epoch(-86_400_000));
        assert_eq!(from_text, from_number);
        assert_eq!(normalize_in(&from_text, &Utc).unwrap(), "1970-01-01");

        for s in ["-", "--1", "-12a"] {
            assert_eq!(RawDate::parse(s).unwrap(), RawDate::Formatted(s.to_string()));
        }
    }

    #[test]
    fn deserializes_from_number_or_string() {
        let d: RawDate = serde_json::from_str("1653350400000").unwrap();
        assert_eq!(d, RawDate::Epoch(MAY_24_2022));

        let d: RawDate = serde_json::from_str("\"1653350400000\"").unwrap();
        assert_eq!(d, RawDate::Epoch(MAY_24_2022));

        let d: RawDate = serde_json::from_str("\"2022-05-24\"").unwrap();
        assert_eq!(d, RawDate::Formatted("2022-05-24".to_string()));
    }

    #[test]
    fn serializes_back_to_wire_form() {
        assert_eq!(
            serde_json::to_string(&RawDate::Epoch(MAY_24_2022)).unwrap(),
            "1653350400000"
        );
        assert_eq!(
            serde_json::to_string(&RawDate::Formatted("2022-05-24".into())).unwrap(),
            "\"2022-05-24\""
        );
    }
}
