//! Fixed two-digit decimal money, stored as integer cents.
//!
//! SQLite has no fixed-point decimal type and binary floats are unacceptable
//! for money, so every monetary column in the schema is integer cents
//! (`BigInt`). This module converts at the edges: catalog TOML prices and CLI
//! output use decimal strings like `"120.50"`.

use anyhow::bail;

/// Parse a non-negative decimal string with at most two fractional digits
/// into cents.
///
/// Accepts `"12"`, `"12.5"`, and `"12.50"`; rejects signs, empty input,
/// more than two fractional digits, and anything non-numeric.
pub fn parse_price_cents(s: &str) -> anyhow::Result<i64> {
    let s = s.trim();
    if s.is_empty() {
        bail!("empty price");
    }
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() || whole.chars().any(|c| !c.is_ascii_digit()) {
        bail!("bad price: {s}");
    }
    if frac.len() > 2 || frac.chars().any(|c| !c.is_ascii_digit()) {
        bail!("bad price: {s} (at most two fractional digits)");
    }
    let whole: i64 = whole.parse()?;
    let frac_cents: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>()? * 10,
        _ => frac.parse()?,
    };
    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(frac_cents))
        .ok_or_else(|| anyhow::anyhow!("price overflow: {s}"))
}

/// Format cents as a decimal string with exactly two fractional digits.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_common_forms() {
        assert_eq!(parse_price_cents("120.50").unwrap(), 12050);
        assert_eq!(parse_price_cents("4.75").unwrap(), 475);
        assert_eq!(parse_price_cents("12.5").unwrap(), 1250);
        assert_eq!(parse_price_cents("12").unwrap(), 1200);
        assert_eq!(parse_price_cents("0.05").unwrap(), 5);
        assert_eq!(parse_price_cents(" 7.00 ").unwrap(), 700);
    }

    #[test]
    fn rejects_invalid_forms() {
        for bad in ["", ".", "12.345", "-1.00", "+2.00", "1,50", "abc", "1.2.3"] {
            assert!(parse_price_cents(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn formats_two_digits() {
        assert_eq!(format_cents(12050), "120.50");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(37050), "370.50");
    }

    proptest! {
        #[test]
        fn format_then_parse_round_trips(cents in 0i64..10_000_000_00) {
            let s = format_cents(cents);
            prop_assert_eq!(parse_price_cents(&s).unwrap(), cents);
        }
    }
}
