use rust_decimal::prelude::*;
use serde::{ser::Error, Serializer};

/// Rounds an `f64` money value to 4 decimal places. `None` when the value does not fit a
/// `Decimal`: NaN, infinities and magnitudes beyond roughly 7.9e28.
pub(crate) fn round_amount(amount: f64) -> Option<Decimal> {
    Decimal::from_f64(amount).map(|value| value.round_dp(4).normalize())
}

pub(crate) fn round_serialize<S>(amount: &f64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // Serialize to 4 decimal
    match round_amount(*amount) {
        Some(rounded_amount) => s.serialize_str(rounded_amount.to_string().as_str()),
        // Too large for a Decimal, and far past any fractional digits worth rounding
        None if amount.is_finite() => s.serialize_f64(*amount),
        None => Err(S::Error::custom(format!("{amount} is not a finite amount"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case(125.5, dec!(125.5) ; "exact")]
    #[test_case(100.0, dec!(100) ; "whole")]
    #[test_case(0.1 + 0.2, dec!(0.3) ; "accumulated error")]
    #[test_case(1.234_56, dec!(1.2346) ; "rounded up")]
    fn rounds_to_four_places(amount: f64, expected: Decimal) {
        assert_eq!(round_amount(amount), Some(expected));
    }

    #[test]
    fn rejects_non_finite() {
        assert_eq!(round_amount(f64::NAN), None);
        assert_eq!(round_amount(f64::INFINITY), None);
    }

    #[test]
    fn large_finite_amount_serializes_as_number() {
        let mut out = Vec::new();
        round_serialize(&1e30, &mut serde_json::Serializer::new(&mut out)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, 1e30);
    }

    #[test]
    fn non_finite_amount_fails_to_serialize() {
        let mut out = Vec::new();
        let result = round_serialize(&f64::NAN, &mut serde_json::Serializer::new(&mut out));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_as_string() {
        let mut out = Vec::new();
        round_serialize(&355.25, &mut serde_json::Serializer::new(&mut out)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\"355.25\"");
    }
}
