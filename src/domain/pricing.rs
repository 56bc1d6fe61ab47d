//! Voucher pricing
//!
//! Resolves a product's price/tax/total after a voucher discount.
//!
//! Both discount kinds scale price and tax by the same factor, so the
//! price:tax ratio of the product is preserved. A fixed voucher is turned
//! into that factor as `(total - value) / total`; it is never subtracted
//! from the price directly.
//!
//! Rounding is asymmetric: price is rounded down and tax is rounded up to
//! whole cents, then the total is recomputed from the rounded parts. The
//! service therefore never under-collects tax nor over-credits price.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DomainError, Discount, Money, Product, Voucher};

/// Price, tax and total after pricing. `total == price + tax` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub price: Money,
    pub tax: Money,
    pub total: Money,
}

/// Apply a voucher to a product.
///
/// # Errors
/// - `InvalidDiscount { field: "price" }` if the discounted price would be
///   negative, or a fixed voucher is worth the whole total or more
/// - `InvalidDiscount { field: "tax" }` if the discounted tax would be negative
/// - `InvalidDiscount { field: "discount_value" }` for a negative percentage
pub fn apply_voucher(product: &Product, voucher: &Voucher) -> Result<PriceBreakdown, DomainError> {
    let price = product.price.value();
    let tax = product.tax.value();

    let (discounted_price, discounted_tax) = match voucher.discount {
        Discount::Percentage(fraction) => {
            if fraction < Decimal::ZERO {
                return Err(DomainError::invalid_discount("discount_value"));
            }
            let keep = Decimal::ONE - fraction;
            (
                price
                    .checked_mul(keep)
                    .ok_or_else(|| DomainError::invalid_discount("price"))?,
                tax.checked_mul(keep)
                    .ok_or_else(|| DomainError::invalid_discount("tax"))?,
            )
        }
        Discount::Fixed(amount) if amount.is_zero() => (price, tax),
        Discount::Fixed(amount) => {
            let total = product.total_price.value();
            if amount.value() >= total {
                return Err(DomainError::invalid_discount("price"));
            }
            let remaining = total - amount.value();
            (
                scale(price, remaining, total).ok_or_else(|| DomainError::invalid_discount("price"))?,
                scale(tax, remaining, total).ok_or_else(|| DomainError::invalid_discount("tax"))?,
            )
        }
    };

    if discounted_price < Decimal::ZERO {
        return Err(DomainError::invalid_discount("price"));
    }
    if discounted_tax < Decimal::ZERO {
        return Err(DomainError::invalid_discount("tax"));
    }

    let price = Money::round_down(discounted_price)?;
    let tax = Money::round_up(discounted_tax)?;
    let total = price.try_add(&tax)?;

    Ok(PriceBreakdown { price, tax, total })
}

/// `amount * numerator / denominator`, multiplying first so that exact
/// results stay exact.
fn scale(amount: Decimal, numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    amount.checked_mul(numerator)?.checked_div(denominator)
}
