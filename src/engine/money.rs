//! Fixed-point money
//!
//! Earnings are `cycle_count × reward_per_cycle`. Keeping both factors as
//! integers means a session that runs for days reports exactly the same
//! total as a hand calculation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An amount in hundredths of the currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cents(u64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub const fn new(cents: u64) -> Self {
        Self(cents)
    }

    /// Reward for `count` cycles. Saturates instead of wrapping.
    pub fn times(self, count: u64) -> Cents {
        Cents(self.0.saturating_mul(count))
    }

    /// Parse a decimal string such as `"1"`, `"1.5"`, `".25"` or `"-3"`.
    ///
    /// Digits past the second decimal place round half up. Negative
    /// amounts clamp to zero. Returns `None` when the text is not a number.
    pub fn parse(text: &str) -> Option<Cents> {
        let text = text.trim();
        let (negative, unsigned) = match text.as_bytes().first().copied()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if negative {
            return Some(Cents::ZERO);
        }

        let mut cents: u64 = 0;
        for digit in whole.bytes() {
            cents = cents.checked_mul(10)?.checked_add(u64::from(digit - b'0'))?;
        }
        let mut digits = fraction.bytes().map(|b| u64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        cents = cents
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths)?
            .checked_add(u64::from(round_up))?;
        Some(Cents(cents))
    }

    /// Convert a floating-point amount, rounding to the nearest cent.
    ///
    /// Negative amounts clamp to zero. NaN and infinities yield `None`.
    pub fn from_f64(amount: f64) -> Option<Cents> {
        if !amount.is_finite() {
            return None;
        }
        if amount <= 0.0 {
            return Some(Cents::ZERO);
        }
        Some(Cents((amount * 100.0).round() as u64))
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Cents::from_f64(n),
            Raw::Text(s) => Cents::parse(&s),
        };
        parsed.ok_or_else(|| serde::de::Error::custom("expected a decimal amount"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(Cents::parse("1"), Some(Cents::new(100)));
        assert_eq!(Cents::parse("1.00"), Some(Cents::new(100)));
        assert_eq!(Cents::parse("1.5"), Some(Cents::new(150)));
        assert_eq!(Cents::parse(".25"), Some(Cents::new(25)));
        assert_eq!(Cents::parse("  12.34 "), Some(Cents::new(1234)));
        assert_eq!(Cents::parse("3."), Some(Cents::new(300)));
    }

    #[test]
    fn rounds_third_decimal_half_up() {
        assert_eq!(Cents::parse("0.125"), Some(Cents::new(13)));
        assert_eq!(Cents::parse("0.124"), Some(Cents::new(12)));
    }

    #[test]
    fn rejects_garbage_and_clamps_negatives() {
        assert_eq!(Cents::parse(""), None);
        assert_eq!(Cents::parse("."), None);
        assert_eq!(Cents::parse("abc"), None);
        assert_eq!(Cents::parse("1.2.3"), None);
        assert_eq!(Cents::parse("1e3"), None);
        assert_eq!(Cents::parse("-3.50"), Some(Cents::ZERO));
    }

    #[test]
    fn parse_overflow_is_rejected() {
        assert_eq!(Cents::parse("99999999999999999999999"), None);
    }

    #[test]
    fn from_f64_rounds_and_clamps() {
        assert_eq!(Cents::from_f64(0.1 + 0.2), Some(Cents::new(30)));
        assert_eq!(Cents::from_f64(-1.0), Some(Cents::ZERO));
        assert_eq!(Cents::from_f64(f64::NAN), None);
        assert_eq!(Cents::from_f64(f64::INFINITY), None);
    }

    #[test]
    fn earnings_stay_exact_over_long_sessions() {
        let rate = Cents::parse("0.10").unwrap();
        assert_eq!(rate.times(1_000_000).to_string(), "100000.00");
        assert_eq!(Cents::new(u64::MAX).times(2), Cents::new(u64::MAX));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Cents::new(105)).unwrap();
        assert_eq!(json, "\"1.05\"");
        let back: Cents = serde_json::from_str("\"1.05\"").unwrap();
        assert_eq!(back, Cents::new(105));
        let from_number: Cents = serde_json::from_str("2.5").unwrap();
        assert_eq!(from_number, Cents::new(250));
    }
}
