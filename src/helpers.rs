//! Shared helpers for numeric rounding and ISO date parsing.
//!
//! Upstream weather values arrive as raw f64s with more precision than the
//! scorer or the UI care about; they are normalised to one decimal place
//! before being stored in a `WeatherObservation`.

use chrono::NaiveDate;

use crate::errors::AppError;

/// Round an f64 to 1 decimal place.
///
/// Returns 0.0 for non-finite inputs (NaN, ±Inf).
pub(crate) fn round_1dp(v: f64) -> f64 {
    if !v.is_finite() {
        tracing::warn!("round_1dp received non-finite value {}, defaulting to 0", v);
        return 0.0;
    }
    (v * 10.0).round() / 10.0
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub(crate) fn parse_iso_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
        AppError::InvalidInput(format!(
            "Invalid date '{}': {} (expected YYYY-MM-DD)",
            s, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_1dp_normal() {
        assert_eq!(round_1dp(3.14), 3.1);
    }

    #[test]
    fn test_round_1dp_rounds_up() {
        assert_eq!(round_1dp(3.16), 3.2);
    }

    #[test]
    fn test_round_1dp_negative() {
        assert_eq!(round_1dp(-4.74), -4.7);
    }

    #[test]
    fn test_round_1dp_nan() {
        assert_eq!(round_1dp(f64::NAN), 0.0);
    }

    #[test]
    fn test_round_1dp_infinity() {
        assert_eq!(round_1dp(f64::INFINITY), 0.0);
        assert_eq!(round_1dp(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_parse_iso_date() {
        let d = parse_iso_date("2026-07-04").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 7, 4).unwrap());
    }

    #[test]
    fn test_parse_iso_date_trims_whitespace() {
        assert!(parse_iso_date(" 2026-07-04 ").is_ok());
    }

    #[test]
    fn test_parse_iso_date_rejects_garbage() {
        let err = parse_iso_date("04/07/2026").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
