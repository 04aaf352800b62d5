use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `dp` decimal places, ties away from zero (`2.05` -> `2.1`).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a number with exactly `dp` decimal places.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = round_half_up(value, dp);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Parse user-entered decimal text. Accepts a decimal comma (`3,5`).
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let normalized = text.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_round_half_up_ties_away_from_zero() {
        assert_eq!(round_half_up(d("2.05"), 1), d("2.1"));
        assert_eq!(round_half_up(d("2.25"), 1), d("2.3"));
        assert_eq!(round_half_up(d("0.5"), 0), d("1"));
        assert_eq!(round_half_up(d("2.5"), 0), d("3"));
        assert_eq!(round_half_up(d("-2.5"), 0), d("-3"));
    }

    #[test]
    fn test_round_half_up_below_tie() {
        assert_eq!(round_half_up(d("2.049"), 1), d("2.0"));
        assert_eq!(round_half_up(d("29.49"), 0), d("29"));
    }

    #[test]
    fn test_format_fixed_pads_scale() {
        assert_eq!(format_fixed(d("3"), 2), "3.00");
        assert_eq!(format_fixed(d("12"), 1), "12.0");
        assert_eq!(format_fixed(d("30.0"), 0), "30");
        assert_eq!(format_fixed(d("2.345"), 2), "2.35");
    }

    #[test]
    fn test_parse_decimal_comma_separator() {
        assert_eq!(parse_decimal("3,5"), Some(d("3.5")));
        assert_eq!(parse_decimal(" 4.25 "), Some(d("4.25")));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("1,2,3"), None);
    }
}
