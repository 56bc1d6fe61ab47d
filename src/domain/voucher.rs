//! Voucher and discount kinds

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Money;

/// How a voucher reduces a product's price.
///
/// Serialized with the storage names `percentage` / `fixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "discount_type", content = "discount_value", rename_all = "snake_case")]
pub enum Discount {
    /// Fraction of the price, `0.10` is 10%
    Percentage(Decimal),
    /// Absolute amount, spread proportionally over price and tax
    Fixed(Money),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: Uuid,
    pub code: String,
    #[serde(flatten)]
    pub discount: Discount,
}

impl Voucher {
    pub fn new(code: impl Into<String>, discount: Discount) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            discount,
        }
    }
}
