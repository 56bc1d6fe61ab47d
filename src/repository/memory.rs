//! In-memory repository
//!
//! Backed by a tokio `RwLock`. Used by tests and for running the service
//! without a database. Enforces the same version rule as the Postgres
//! adapter.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Entity, Repository, RepositoryError};
use crate::aggregate::Subscription;
use crate::domain::{Product, User, Voucher};

#[derive(Debug, Default)]
struct Store {
    users: HashMap<Uuid, User>,
    products: Vec<Product>,
    vouchers: HashMap<String, Voucher>,
    subscriptions: HashMap<Uuid, Subscription>,
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    store: RwLock<Store>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.store.get_mut().users.insert(user.id, user);
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.store.get_mut().products.push(product);
        self
    }

    pub fn with_voucher(mut self, voucher: Voucher) -> Self {
        self.store
            .get_mut()
            .vouchers
            .insert(voucher.code.clone(), voucher);
        self
    }

    /// Number of successful subscription writes (inserts and updates)
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail as if the database were unreachable
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_user(&self, user_id: Uuid) -> Result<User, RepositoryError> {
        self.store
            .read()
            .await
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(Entity::User, user_id))
    }

    async fn get_product(&self, product_id: Uuid) -> Result<Product, RepositoryError> {
        self.store
            .read()
            .await
            .products
            .iter()
            .find(|product| product.id == product_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(Entity::Product, product_id))
    }

    async fn get_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.store.read().await.products.clone();
        products.sort_by(|a, b| {
            (a.duration_days, &a.name, a.id).cmp(&(b.duration_days, &b.name, b.id))
        });
        Ok(products)
    }

    async fn get_voucher_by_code(&self, code: &str) -> Result<Voucher, RepositoryError> {
        self.store
            .read()
            .await
            .vouchers
            .get(code)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(Entity::Voucher, code))
    }

    async fn get_subscription(&self, subscription_id: Uuid) -> Result<Subscription, RepositoryError> {
        self.store
            .read()
            .await
            .subscriptions
            .get(&subscription_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(Entity::Subscription, subscription_id))
    }

    async fn save_subscription(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        self.check_writable()?;

        let mut store = self.store.write().await;
        if store.subscriptions.contains_key(&subscription.id()) {
            return Err(RepositoryError::AlreadyExists {
                entity: Entity::Subscription,
                id: subscription.id().to_string(),
            });
        }
        store
            .subscriptions
            .insert(subscription.id(), subscription.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_subscription(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        self.check_writable()?;

        let mut store = self.store.write().await;
        let stored = store
            .subscriptions
            .get_mut(&subscription.id())
            .ok_or_else(|| RepositoryError::not_found(Entity::Subscription, subscription.id()))?;

        if stored.version != subscription.version {
            return Err(RepositoryError::VersionConflict {
                subscription_id: subscription.id(),
                expected: subscription.version,
            });
        }

        // Only lifecycle fields are writable after creation
        stored.status = subscription.status;
        stored.paused_date = subscription.paused_date;
        stored.unpaused_date = subscription.unpaused_date;
        stored.canceled_date = subscription.canceled_date;
        stored.version += 1;

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::SubscriptionStatus;
    use crate::domain::{Discount, Money};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn product() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "basic plan".to_string(),
            duration_days: 30,
            price: Money::new(dec!(10)).unwrap(),
            tax: Money::new(dec!(1)).unwrap(),
            total_price: Money::new(dec!(11)).unwrap(),
        }
    }

    fn subscription(product: &Product) -> Subscription {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        Subscription::create(
            Uuid::new_v4(),
            Uuid::new_v4(),
            product,
            product.base_price(),
            today,
            false,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_entities_report_not_found() {
        let repo = InMemoryRepository::new();

        let err = repo.get_user(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { entity: Entity::User, .. }));

        let err = repo.get_voucher_by_code("nope").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { entity: Entity::Voucher, .. }));
    }

    #[tokio::test]
    async fn test_products_ordered_by_duration_then_name() {
        let yearly = Product {
            name: "enterprise plan".to_string(),
            duration_days: 365,
            ..product()
        };
        let standard = Product {
            name: "standard plan".to_string(),
            ..product()
        };
        let basic = product();
        let repo = InMemoryRepository::new()
            .with_product(yearly.clone())
            .with_product(standard.clone())
            .with_product(basic.clone());

        let products = repo.get_products().await.unwrap();
        assert_eq!(products, vec![basic, standard, yearly.clone()]);
        assert_eq!(repo.get_product(yearly.id).await.unwrap(), yearly);
    }

    #[tokio::test]
    async fn test_voucher_lookup_by_code() {
        let voucher = Voucher::new("fixed5", Discount::Fixed(Money::new(dec!(5)).unwrap()));
        let repo = InMemoryRepository::new().with_voucher(voucher.clone());

        assert_eq!(repo.get_voucher_by_code("fixed5").await.unwrap(), voucher);
    }

    #[tokio::test]
    async fn test_save_then_duplicate_rejected() {
        let repo = InMemoryRepository::new();
        let sub = subscription(&product());

        repo.save_subscription(&sub).await.unwrap();
        let err = repo.save_subscription(&sub).await.unwrap_err();

        assert!(matches!(err, RepositoryError::AlreadyExists { .. }));
        assert_eq!(repo.write_count(), 1);
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let repo = InMemoryRepository::new();
        let mut sub = subscription(&product());
        repo.save_subscription(&sub).await.unwrap();

        sub.cancel(sub.start_date()).unwrap();
        repo.update_subscription(&sub).await.unwrap();

        let stored = repo.get_subscription(sub.id()).await.unwrap();
        assert_eq!(stored.status(), SubscriptionStatus::Canceled);
        assert_eq!(stored.version(), sub.version() + 1);
        assert_eq!(repo.write_count(), 2);
    }

    #[tokio::test]
    async fn test_stale_update_is_a_version_conflict() {
        let repo = InMemoryRepository::new();
        let sub = subscription(&product());
        repo.save_subscription(&sub).await.unwrap();

        // Two writers load the same version
        let mut first = repo.get_subscription(sub.id()).await.unwrap();
        let mut second = repo.get_subscription(sub.id()).await.unwrap();

        first.pause(sub.start_date()).unwrap();
        repo.update_subscription(&first).await.unwrap();

        second.cancel(sub.start_date()).unwrap();
        let err = repo.update_subscription(&second).await.unwrap_err();
        assert!(matches!(err, RepositoryError::VersionConflict { expected: 0, .. }));

        let stored = repo.get_subscription(sub.id()).await.unwrap();
        assert_eq!(stored.status(), SubscriptionStatus::Paused);
    }

    #[tokio::test]
    async fn test_failing_writes() {
        let repo = InMemoryRepository::new();
        repo.set_fail_writes(true);

        let err = repo.save_subscription(&subscription(&product())).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Database(_)));
        assert_eq!(repo.write_count(), 0);
    }
}
