//! Subscribe Handler
//!
//! Creates a subscription for a user, optionally priced with a voucher and
//! optionally starting with a trial.

use std::sync::Arc;

use uuid::Uuid;

use crate::aggregate::Subscription;
use crate::domain::{apply_voucher, Clock, OperationContext};
use crate::error::AppError;
use crate::repository::Repository;
use crate::state::AppState;

use super::{SubscribeCommand, SubscribeResult};

/// Handler for new subscriptions
pub struct SubscribeHandler {
    repository: Arc<dyn Repository>,
    clock: Arc<dyn Clock>,
}

impl SubscribeHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            clock: state.clock.clone(),
        }
    }

    /// Execute the subscribe command.
    ///
    /// Lookups run in order user, product, voucher; the first missing one is
    /// reported. Nothing is written unless every step succeeds.
    pub async fn execute(
        &self,
        command: SubscribeCommand,
        context: &OperationContext,
    ) -> Result<SubscribeResult, AppError> {
        let user = self.repository.get_user(command.user_id).await?;
        let product = self.repository.get_product(command.product_id).await?;

        let pricing = match command.effective_voucher_code() {
            Some(code) => {
                let voucher = self.repository.get_voucher_by_code(code).await?;
                apply_voucher(&product, &voucher)?
            }
            None => product.base_price(),
        };

        let subscription = Subscription::create(
            Uuid::new_v4(),
            user.id,
            &product,
            pricing,
            self.clock.today(),
            command.trial_period,
        )?;

        self.repository.save_subscription(&subscription).await?;

        tracing::info!(
            subscription_id = %subscription.id(),
            user_id = %user.id,
            product_id = %product.id,
            voucher_code = ?command.effective_voucher_code(),
            trial = command.trial_period,
            total_price = %subscription.total_price(),
            correlation_id = ?context.correlation_id,
            "Subscription created"
        );

        Ok(SubscribeResult {
            subscription_id: subscription.id(),
            start_date: subscription.start_date(),
            end_date: subscription.end_date(),
            total_price: subscription.total_price(),
        })
    }
}
