//! Command definitions
//!
//! Commands represent intentions to change the system state.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Money;

// =========================================================================
// SubscribeCommand
// =========================================================================

/// Command to subscribe a user to a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeCommand {
    pub user_id: Uuid,
    pub product_id: Uuid,
    /// Voucher to apply; an empty code counts as none
    pub voucher_code: Option<String>,
    /// Start with a 30-day trial
    pub trial_period: bool,
}

impl SubscribeCommand {
    pub fn new(user_id: Uuid, product_id: Uuid) -> Self {
        Self {
            user_id,
            product_id,
            voucher_code: None,
            trial_period: false,
        }
    }

    pub fn with_voucher(mut self, voucher_code: impl Into<String>) -> Self {
        self.voucher_code = Some(voucher_code.into());
        self
    }

    pub fn with_trial(mut self, trial_period: bool) -> Self {
        self.trial_period = trial_period;
        self
    }

    /// The voucher code, unless absent or blank. Any other code is looked
    /// up exactly as given.
    pub fn effective_voucher_code(&self) -> Option<&str> {
        self.voucher_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }
}

/// Result of a successful subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeResult {
    pub subscription_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: Money,
}

// =========================================================================
// LifecycleAction
// =========================================================================

/// Lifecycle operation on an existing subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleAction {
    Pause,
    Unpause,
    Cancel,
}

impl LifecycleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleAction::Pause => "pause",
            LifecycleAction::Unpause => "unpause",
            LifecycleAction::Cancel => "cancel",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pause" => Ok(LifecycleAction::Pause),
            "unpause" => Ok(LifecycleAction::Unpause),
            "cancel" => Ok(LifecycleAction::Cancel),
            other => Err(format!("action '{}' is not supported", other)),
        }
    }
}
