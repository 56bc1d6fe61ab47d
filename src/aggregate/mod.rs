//! Aggregate module
//!
//! Entities whose state changes are guarded by business rules.

pub mod subscription;

pub use subscription::{Subscription, SubscriptionStatus, TRIAL_PERIOD_DAYS};
