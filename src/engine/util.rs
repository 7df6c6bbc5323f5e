// src/engine/util.rs - Shared rounding helper
//
// The original Python source rounds with `round(x, n)` (banker's rounding
// on ties, negligible at gram/penny precision). `f64::round` is
// round-half-away-from-zero; the difference never shows up at the
// precisions used here (1 decimal place for grams, 2 for money).

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_grams_to_one_decimal() {
        assert_eq!(round_to(356.04999, 1), 356.0);
        assert_eq!(round_to(237.449, 1), 237.4);
    }

    #[test]
    fn rounds_money_to_two_decimals() {
        assert_eq!(round_to(12.345, 2), 12.35);
    }
}
