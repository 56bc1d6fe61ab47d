//! Product catalog entry

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pricing::{self, PriceBreakdown};
use super::{DomainError, Money, Voucher};

/// A subscribable product.
///
/// `total_price` is expected to equal `price + tax` but is taken as stored;
/// the fixed-discount formula divides by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub duration_days: u32,
    pub price: Money,
    pub tax: Money,
    pub total_price: Money,
}

impl Product {
    /// The undiscounted figures
    pub fn base_price(&self) -> PriceBreakdown {
        PriceBreakdown {
            price: self.price,
            tax: self.tax,
            total: self.total_price,
        }
    }

    /// Copy of this product with the voucher applied to its price fields.
    pub fn with_voucher(&self, voucher: &Voucher) -> Result<Product, DomainError> {
        let priced = pricing::apply_voucher(self, voucher)?;
        Ok(Product {
            price: priced.price,
            tax: priced.tax,
            total_price: priced.total,
            ..self.clone()
        })
    }
}
