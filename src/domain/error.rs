//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use chrono::NaiveDate;
use thiserror::Error;

use super::MoneyError;

/// Business rule violations raised by pricing and the subscription
/// state machine. Independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Applying a voucher would push a figure below zero
    #[error("Invalid discount: {field} couldn't be less than 0")]
    InvalidDiscount { field: &'static str },

    /// A lifecycle guard rejected the requested transition
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// A computed amount is not representable as Money
    #[error("Invalid money value: {0}")]
    InvalidMoney(#[from] MoneyError),

    /// A computed date falls outside the supported calendar
    #[error("Date out of range: {start} + {days} days")]
    DateOutOfRange { start: NaiveDate, days: u32 },
}

impl DomainError {
    pub fn invalid_discount(field: &'static str) -> Self {
        Self::InvalidDiscount { field }
    }

    /// Stable machine-readable code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDiscount { .. } => "invalid_discount",
            Self::InvalidTransition(e) => e.error_code(),
            Self::InvalidMoney(_) => "invalid_money",
            Self::DateOutOfRange { .. } => "date_out_of_range",
        }
    }
}

/// One variant per state machine guard.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("subscription is already paused")]
    AlreadyPaused,

    #[error("subscription is already active")]
    AlreadyActive,

    #[error("subscription is already canceled")]
    AlreadyCanceled,

    #[error("can't pause subscription during trial period (trial ends {trial_end})")]
    TrialInProgress { trial_end: NaiveDate },

    #[error("can't cancel subscription while it is paused")]
    CannotCancelWhilePaused,
}

impl TransitionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyPaused => "already_paused",
            Self::AlreadyActive => "already_active",
            Self::AlreadyCanceled => "already_canceled",
            Self::TrialInProgress { .. } => "trial_in_progress",
            Self::CannotCancelWhilePaused => "cannot_cancel_while_paused",
        }
    }
}
