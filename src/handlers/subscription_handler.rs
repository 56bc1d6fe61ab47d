//! Subscription Handler
//!
//! Lookup and lifecycle management of existing subscriptions. Each lifecycle
//! call is a single read-modify-write; a rejected transition writes nothing.

use std::sync::Arc;

use uuid::Uuid;

use crate::aggregate::Subscription;
use crate::domain::{Clock, OperationContext};
use crate::error::AppError;
use crate::repository::Repository;
use crate::state::AppState;

use super::LifecycleAction;

pub struct SubscriptionHandler {
    repository: Arc<dyn Repository>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
            clock: state.clock.clone(),
        }
    }

    pub async fn find(&self, subscription_id: Uuid) -> Result<Subscription, AppError> {
        Ok(self.repository.get_subscription(subscription_id).await?)
    }

    pub async fn pause(
        &self,
        subscription_id: Uuid,
        context: &OperationContext,
    ) -> Result<Subscription, AppError> {
        self.execute(subscription_id, LifecycleAction::Pause, context).await
    }

    pub async fn unpause(
        &self,
        subscription_id: Uuid,
        context: &OperationContext,
    ) -> Result<Subscription, AppError> {
        self.execute(subscription_id, LifecycleAction::Unpause, context).await
    }

    pub async fn cancel(
        &self,
        subscription_id: Uuid,
        context: &OperationContext,
    ) -> Result<Subscription, AppError> {
        self.execute(subscription_id, LifecycleAction::Cancel, context).await
    }

    /// Apply a lifecycle action and persist the result.
    ///
    /// Returns the subscription as stored after the write.
    pub async fn execute(
        &self,
        subscription_id: Uuid,
        action: LifecycleAction,
        context: &OperationContext,
    ) -> Result<Subscription, AppError> {
        let mut subscription = self.repository.get_subscription(subscription_id).await?;
        let today = self.clock.today();

        let outcome = match action {
            LifecycleAction::Pause => subscription.pause(today),
            LifecycleAction::Unpause => subscription.unpause(today),
            LifecycleAction::Cancel => subscription.cancel(today),
        };

        if let Err(e) = outcome {
            tracing::warn!(
                subscription_id = %subscription_id,
                action = %action,
                status = %subscription.status(),
                reason = %e,
                correlation_id = ?context.correlation_id,
                "Lifecycle transition rejected"
            );
            return Err(e.into());
        }

        self.repository.update_subscription(&subscription).await?;
        subscription.version += 1;

        tracing::info!(
            subscription_id = %subscription_id,
            action = %action,
            status = %subscription.status(),
            correlation_id = ?context.correlation_id,
            "Subscription updated"
        );

        Ok(subscription)
    }
}
