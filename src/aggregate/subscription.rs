//! Subscription Aggregate
//!
//! A user's time-bounded enrollment in a product and its lifecycle:
//!
//! | From      | pause             | unpause          | cancel                     |
//! |-----------|-------------------|------------------|----------------------------|
//! | active    | paused (no trial) | already active   | canceled                   |
//! | paused    | already paused    | active           | cannot cancel while paused |
//! | canceled  | already canceled  | already canceled | already canceled           |
//!
//! `canceled` is terminal. A trial is not a state of its own: it is a date
//! window on an active subscription during which pausing is refused.
//! Every guard is checked before any field is touched.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::{DomainError, Money, PriceBreakdown, Product, TransitionError};

/// Length of the free trial, independent of the product duration
pub const TRIAL_PERIOD_DAYS: u32 = 30;

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "paused" => Ok(SubscriptionStatus::Paused),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            other => Err(format!("unknown subscription status '{}'", other)),
        }
    }
}

/// Subscription Aggregate
///
/// Prices are frozen at subscribe time. Only the lifecycle methods below
/// change `status` and the matching date fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub(crate) id: Uuid,
    pub(crate) user_id: Uuid,
    pub(crate) product_id: Uuid,
    pub(crate) start_date: NaiveDate,
    pub(crate) end_date: NaiveDate,
    pub(crate) duration_days: u32,
    pub(crate) price: Money,
    pub(crate) tax: Money,
    pub(crate) total_price: Money,
    pub(crate) status: SubscriptionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) trial_start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) trial_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) paused_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) unpaused_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) canceled_date: Option<NaiveDate>,
    /// Optimistic concurrency counter, bumped by every stored update
    pub(crate) version: i64,
}

impl Subscription {
    /// Start a new active subscription on `start_date`.
    ///
    /// The end date is `start_date + product.duration_days`; a trial, when
    /// requested, runs for `TRIAL_PERIOD_DAYS` from the start date.
    pub fn create(
        id: Uuid,
        user_id: Uuid,
        product: &Product,
        pricing: PriceBreakdown,
        start_date: NaiveDate,
        with_trial: bool,
    ) -> Result<Self, DomainError> {
        let end_date = add_days(start_date, product.duration_days)?;

        let (trial_start_date, trial_end_date) = if with_trial {
            (Some(start_date), Some(add_days(start_date, TRIAL_PERIOD_DAYS)?))
        } else {
            (None, None)
        };

        Ok(Self {
            id,
            user_id,
            product_id: product.id,
            start_date,
            end_date,
            duration_days: product.duration_days,
            price: pricing.price,
            tax: pricing.tax,
            total_price: pricing.total,
            status: SubscriptionStatus::Active,
            trial_start_date,
            trial_end_date,
            paused_date: None,
            unpaused_date: None,
            canceled_date: None,
            version: 0,
        })
    }

    // =========================================================================
    // Lifecycle transitions
    // =========================================================================

    /// Pause an active subscription whose trial (if any) is over.
    ///
    /// A trial ending today no longer blocks the pause.
    pub fn pause(&mut self, today: NaiveDate) -> Result<(), TransitionError> {
        match self.status {
            SubscriptionStatus::Paused => return Err(TransitionError::AlreadyPaused),
            SubscriptionStatus::Canceled => return Err(TransitionError::AlreadyCanceled),
            SubscriptionStatus::Active => {}
        }

        if let Some(trial_end) = self.trial_end_date.filter(|_| self.is_in_trial(today)) {
            return Err(TransitionError::TrialInProgress { trial_end });
        }

        self.status = SubscriptionStatus::Paused;
        self.paused_date = Some(today);
        Ok(())
    }

    /// Resume a paused subscription
    pub fn unpause(&mut self, today: NaiveDate) -> Result<(), TransitionError> {
        match self.status {
            SubscriptionStatus::Active => return Err(TransitionError::AlreadyActive),
            SubscriptionStatus::Canceled => return Err(TransitionError::AlreadyCanceled),
            SubscriptionStatus::Paused => {}
        }

        self.status = SubscriptionStatus::Active;
        self.unpaused_date = Some(today);
        Ok(())
    }

    /// Cancel an active subscription. Paused subscriptions must be
    /// unpaused first.
    pub fn cancel(&mut self, today: NaiveDate) -> Result<(), TransitionError> {
        match self.status {
            SubscriptionStatus::Paused => return Err(TransitionError::CannotCancelWhilePaused),
            SubscriptionStatus::Canceled => return Err(TransitionError::AlreadyCanceled),
            SubscriptionStatus::Active => {}
        }

        self.status = SubscriptionStatus::Canceled;
        self.canceled_date = Some(today);
        Ok(())
    }

    /// Whether the trial window still covers `today`
    pub fn is_in_trial(&self, today: NaiveDate) -> bool {
        self.trial_end_date.is_some_and(|end| end > today)
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn product_id(&self) -> Uuid {
        self.product_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn trial_start_date(&self) -> Option<NaiveDate> {
        self.trial_start_date
    }

    pub fn trial_end_date(&self) -> Option<NaiveDate> {
        self.trial_end_date
    }

    pub fn paused_date(&self) -> Option<NaiveDate> {
        self.paused_date
    }

    pub fn unpaused_date(&self) -> Option<NaiveDate> {
        self.unpaused_date
    }

    pub fn canceled_date(&self) -> Option<NaiveDate> {
        self.canceled_date
    }

    pub fn version(&self) -> i64 {
        self.version
    }
}

fn add_days(start: NaiveDate, days: u32) -> Result<NaiveDate, DomainError> {
    start
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or(DomainError::DateOutOfRange { start, days })
}
