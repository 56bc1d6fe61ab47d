//! Money type
//!
//! Domain primitive for currency amounts. Values are exact base-10 fixed point
//! with at most two decimal places, so every `Money` is also a whole number of
//! minor units (cents).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// Maximum representable amount (1 trillion)
const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Decimal places kept for currency values
pub const MONEY_SCALE: u32 = 2;

/// Money represents a non-negative currency amount.
///
/// # Invariants
/// - Value is zero or positive
/// - At most 2 decimal places
/// - Maximum value is 1 trillion
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use subscription_service::domain::Money;
///
/// let price = Money::new(Decimal::new(1999, 2)).unwrap();
/// assert_eq!(price.minor_units(), 1999);
/// assert_eq!(price.to_string(), "19.99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money(Decimal);

/// Errors that can occur when creating Money
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Money must not be negative (got {0})")]
    Negative(Decimal),

    #[error("Money has too many decimal places (max {MONEY_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Money exceeds maximum allowed value ({MAX_AMOUNT})")]
    Overflow,

    #[error("Invalid money format: {0}")]
    ParseError(String),
}

impl Money {
    /// Create a new Money value with validation.
    ///
    /// Trailing zeros beyond two places are accepted (`10.500` is `10.50`).
    ///
    /// # Errors
    /// - `MoneyError::Negative` if value < 0
    /// - `MoneyError::TooManyDecimals` if more than 2 significant decimal places
    /// - `MoneyError::Overflow` if value > 1 trillion
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        // Also folds a negative zero into plain zero
        if value.is_zero() {
            return Ok(Self::zero());
        }

        if value.is_sign_negative() {
            return Err(MoneyError::Negative(value));
        }

        let normalized = value.normalize();
        if normalized.scale() > MONEY_SCALE {
            return Err(MoneyError::TooManyDecimals(normalized.scale()));
        }

        if value > MAX_AMOUNT {
            return Err(MoneyError::Overflow);
        }

        let mut value = normalized;
        value.rescale(MONEY_SCALE);
        Ok(Self(value))
    }

    /// Zero amount
    pub fn zero() -> Self {
        Self(Decimal::new(0, MONEY_SCALE))
    }

    /// Create Money from an integer number of minor units (cents).
    pub fn from_minor_units(units: i64) -> Result<Self, MoneyError> {
        Self::new(Decimal::new(units, MONEY_SCALE))
    }

    /// Round an arbitrary-precision value down (toward negative infinity)
    /// to two decimal places.
    pub fn round_down(value: Decimal) -> Result<Self, MoneyError> {
        Self::new(value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToNegativeInfinity))
    }

    /// Round an arbitrary-precision value up (toward positive infinity)
    /// to two decimal places.
    pub fn round_up(value: Decimal) -> Result<Self, MoneyError> {
        Self::new(value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToPositiveInfinity))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Integer view in minor units. Cannot overflow: the value is bounded
    /// by `MAX_AMOUNT` and always carries exactly two decimal places.
    pub fn minor_units(&self) -> i64 {
        self.0.mantissa() as i64
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Add two amounts, failing if the sum exceeds the maximum.
    pub fn try_add(&self, other: &Money) -> Result<Money, MoneyError> {
        let sum = self.0.checked_add(other.0).ok_or(MoneyError::Overflow)?;
        Money::new(sum)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| MoneyError::ParseError(e.to_string()))?;
        Money::new(decimal)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl TryFrom<String> for Money {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Money::from_str(&value)
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

impl Add for Money {
    type Output = Result<Money, MoneyError>;

    fn add(self, rhs: Self) -> Self::Output {
        self.try_add(&rhs)
    }
}

// No Sub: a difference may be negative. Pricing works on raw Decimals and
// converts back through `round_down` / `round_up`.

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_positive() {
        let money = Money::new(dec!(100)).unwrap();
        assert_eq!(money.value(), dec!(100.00));
        assert_eq!(money.to_string(), "100.00");
    }

    #[test]
    fn test_money_zero_allowed() {
        let money = Money::new(Decimal::ZERO).unwrap();
        assert!(money.is_zero());
        assert_eq!(money, Money::zero());
    }

    #[test]
    fn test_money_negative_rejected() {
        let money = Money::new(dec!(-0.01));
        assert!(matches!(money, Err(MoneyError::Negative(_))));
    }

    #[test]
    fn test_money_too_many_decimals() {
        let money = Money::new(dec!(1.005));
        assert!(matches!(money, Err(MoneyError::TooManyDecimals(3))));
    }

    #[test]
    fn test_money_trailing_zeros_accepted() {
        let money = Money::new(dec!(10.5000)).unwrap();
        assert_eq!(money.to_string(), "10.50");
    }

    #[test]
    fn test_money_overflow() {
        let money = Money::new(dec!(1000000000000.01));
        assert!(matches!(money, Err(MoneyError::Overflow)));
        assert!(Money::new(dec!(1000000000000)).is_ok());
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(Money::new(dec!(91.66)).unwrap().minor_units(), 9166);
        assert_eq!(Money::new(dec!(7)).unwrap().minor_units(), 700);
        assert_eq!(Money::from_minor_units(1834).unwrap().value(), dec!(18.34));
    }

    #[test]
    fn test_round_down_and_up() {
        assert_eq!(Money::round_down(dec!(91.6666)).unwrap().value(), dec!(91.66));
        assert_eq!(Money::round_up(dec!(18.3333)).unwrap().value(), dec!(18.34));
        // Already on a cent boundary: both directions keep the value
        assert_eq!(Money::round_down(dec!(90.00)).unwrap().value(), dec!(90));
        assert_eq!(Money::round_up(dec!(18.000)).unwrap().value(), dec!(18));
    }

    #[test]
    fn test_round_down_negative_rejected() {
        assert!(matches!(
            Money::round_down(dec!(-0.001)),
            Err(MoneyError::Negative(_))
        ));
    }

    #[test]
    fn test_money_from_str() {
        let money: Money = "27.5".parse().unwrap();
        assert_eq!(money.minor_units(), 2750);
        assert!(matches!(
            "abc".parse::<Money>(),
            Err(MoneyError::ParseError(_))
        ));
    }

    #[test]
    fn test_money_add() {
        let sum = (Money::new(dec!(91.66)).unwrap() + Money::new(dec!(18.34)).unwrap()).unwrap();
        assert_eq!(sum.to_string(), "110.00");
    }

    #[test]
    fn test_money_serde_as_string() {
        let money = Money::new(dec!(18.3)).unwrap();
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, r#""18.30""#);

        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, money);
    }
}
