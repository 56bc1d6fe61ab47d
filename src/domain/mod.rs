//! Domain module
//!
//! Core domain types and business logic: money, catalog records,
//! voucher pricing and the calendar source.

pub mod clock;
pub mod context;
pub mod error;
pub mod money;
pub mod pricing;
pub mod product;
pub mod user;
pub mod voucher;

pub use clock::{Clock, FixedClock, SystemClock};
pub use context::OperationContext;
pub use error::{DomainError, TransitionError};
pub use money::{Money, MoneyError};
pub use pricing::{apply_voucher, PriceBreakdown};
pub use product::Product;
pub use user::User;
pub use voucher::{Discount, Voucher};
