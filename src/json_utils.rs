//! Serde helpers for JSON request bodies.
//!
//! Partial updates need to tell "field absent" (keep the stored value) apart
//! from "field is null" (clear it). Wrapping the field in `Option<Option<T>>`
//! with `#[serde(default, deserialize_with = "deserialize_some")]` yields
//! `None` for absent and `Some(None)` for an explicit `null`.
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Parse a calendar date, tolerating a trailing time component
/// (`2024-03-01T00:00:00Z`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// Largest accepted single amount in cents. A million entries at this size
/// still fit in an `i64` total.
pub const MAX_AMOUNT_CENTS: i64 = i64::MAX / 1_000_000;

/// Convert a decimal currency amount to cents, rejecting negative,
/// non-finite and oversized input.
pub fn amount_to_cents(field: &str, amount: f64) -> Result<i64, String> {
    if !amount.is_finite() {
        return Err(format!("{} must be a number", field));
    }
    if amount < 0.0 {
        return Err(format!("{} must not be negative", field));
    }
    let cents = (amount * 100.0).round();
    if cents > MAX_AMOUNT_CENTS as f64 {
        return Err(format!(
            "{} must not exceed {}",
            field,
            MAX_AMOUNT_CENTS / 100
        ));
    }
    Ok(cents as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        flag: Option<Option<bool>>,
    }

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.flag, None);
        let null: Patch = serde_json::from_str(r#"{"flag": null}"#).unwrap();
        assert_eq!(null.flag, Some(None));
        let set: Patch = serde_json::from_str(r#"{"flag": true}"#).unwrap();
        assert_eq!(set.flag, Some(Some(true)));
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_date("2024-03-01"), expected);
        assert_eq!(parse_date("2024-03-01T12:30:00Z"), expected);
        assert_eq!(parse_date("01/03/2024"), None);
    }

    #[test]
    fn test_amount_to_cents() {
        assert_eq!(amount_to_cents("amount", 12.34), Ok(1234));
        assert_eq!(amount_to_cents("amount", 0.0), Ok(0));
        assert!(amount_to_cents("amount", -1.0).is_err());
        assert!(amount_to_cents("amount", f64::NAN).is_err());
        assert!(amount_to_cents("amount", 1e17).is_err());
        assert_eq!(
            amount_to_cents("amount", (MAX_AMOUNT_CENTS / 100) as f64),
            Ok(MAX_AMOUNT_CENTS / 100 * 100)
        );
    }
}
