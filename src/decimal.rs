use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// Money type with 2 decimal places, rounded half-away-from-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(round2(d))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(round2(Decimal::from_str(s)?)))
    }

    /// create from whole currency units
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from cents
    pub fn from_cents(amount: i64) -> Self {
        Money(round2(Decimal::from(amount) / Decimal::from(100)))
    }

    /// create from an f64, rounding; non-finite input maps to zero
    /// (callers must screen for non-finite results before converting)
    pub fn from_f64_lossy(v: f64) -> Self {
        match Decimal::from_f64(v) {
            Some(d) => Money(round2(d)),
            None => Money::ZERO,
        }
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as f64 for formula inputs
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// percentage of this amount (e.g., 1.5 for 1.5%)
    pub fn percentage(&self, rate: Decimal) -> Self {
        Money(round2(self.0 * rate / Decimal::from(100)))
    }

    /// apply a fractional rate (e.g., 0.02 for 2%)
    pub fn apply_rate(&self, rate: Rate) -> Self {
        Money(round2(self.0 * rate.as_decimal()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(round2(self.0 + other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = round2(self.0 + other.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(round2(self.0 - other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = round2(self.0 - other.0);
    }
}

/// rate type for percentages and fee rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.02 for 2%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 2 for 2%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_to_cents() {
        let m = Money::from_str_exact("25.004").unwrap();
        assert_eq!(m.to_string(), "25.00");

        let m = Money::from_str_exact("25.006").unwrap();
        assert_eq!(m.to_string(), "25.01");
    }

    #[test]
    fn test_half_away_from_zero() {
        // banker's rounding would give 0.12 here
        assert_eq!(Money::from_decimal(dec!(0.125)).to_string(), "0.13");
        assert_eq!(Money::from_decimal(dec!(-0.125)).to_string(), "-0.13");
        assert_eq!(Money::from_decimal(dec!(2.675)).to_string(), "2.68");
    }

    #[test]
    fn test_percentage() {
        let wages = Money::from_major(3_000);
        assert_eq!(wages.percentage(dec!(1.5)), Money::from_str_exact("45.00").unwrap());
    }

    #[test]
    fn test_apply_rate() {
        let amount = Money::from_str_exact("52.50").unwrap();
        let fee = amount.apply_rate(Rate::from_percentage(2));
        assert_eq!(fee, Money::from_str_exact("1.05").unwrap());
    }

    #[test]
    fn test_from_f64_lossy() {
        assert_eq!(Money::from_f64_lossy(45.555), Money::from_str_exact("45.56").unwrap());
        assert_eq!(Money::from_f64_lossy(f64::NAN), Money::ZERO);
        assert_eq!(Money::from_f64_lossy(f64::INFINITY), Money::ZERO);
    }
}
