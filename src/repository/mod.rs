//! Persistence port
//!
//! Handlers talk to storage only through the `Repository` trait so the same
//! business logic runs against PostgreSQL in production and an in-memory
//! store in tests.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::aggregate::Subscription;
use crate::domain::{Product, User, Voucher};

pub use error::{Entity, RepositoryError};
pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> Result<User, RepositoryError>;

    async fn get_product(&self, product_id: Uuid) -> Result<Product, RepositoryError>;

    /// Whole catalog, shortest duration first, then by name
    async fn get_products(&self) -> Result<Vec<Product>, RepositoryError>;

    async fn get_voucher_by_code(&self, code: &str) -> Result<Voucher, RepositoryError>;

    async fn get_subscription(&self, subscription_id: Uuid) -> Result<Subscription, RepositoryError>;

    /// Insert a new subscription
    async fn save_subscription(&self, subscription: &Subscription) -> Result<(), RepositoryError>;

    /// Persist status and lifecycle dates of an existing subscription.
    ///
    /// The stored version must equal `subscription.version()`; on success it
    /// is incremented. A mismatch yields `RepositoryError::VersionConflict`.
    async fn update_subscription(&self, subscription: &Subscription) -> Result<(), RepositoryError>;
}
