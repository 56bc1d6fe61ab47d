//! PostgreSQL repository
//!
//! Money columns are `NUMERIC(15,2)` and map to `rust_decimal::Decimal`;
//! subscription status is stored as its lowercase name.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Entity, Repository, RepositoryError};
use crate::aggregate::{Subscription, SubscriptionStatus};
use crate::domain::{Discount, Money, Product, User, Voucher};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    second_name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            first_name: row.first_name,
            second_name: row.second_name,
            email: row.email,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    duration_days: i32,
    price: Decimal,
    tax: Decimal,
    total_price: Decimal,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: row.id,
            name: row.name,
            duration_days: days_from_column(row.duration_days)?,
            price: money_from_column(row.price)?,
            tax: money_from_column(row.tax)?,
            total_price: money_from_column(row.total_price)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VoucherRow {
    id: Uuid,
    code: String,
    discount_type: String,
    discount_value: Decimal,
}

impl TryFrom<VoucherRow> for Voucher {
    type Error = RepositoryError;

    fn try_from(row: VoucherRow) -> Result<Self, Self::Error> {
        let discount = match row.discount_type.as_str() {
            "percentage" => Discount::Percentage(row.discount_value),
            "fixed" => Discount::Fixed(money_from_column(row.discount_value)?),
            other => {
                return Err(RepositoryError::InvalidRecord(format!(
                    "voucher {} has unknown discount type '{}'",
                    row.code, other
                )))
            }
        };

        Ok(Voucher {
            id: row.id,
            code: row.code,
            discount,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    duration_days: i32,
    price: Decimal,
    tax: Decimal,
    total_price: Decimal,
    status: String,
    trial_start_date: Option<NaiveDate>,
    trial_end_date: Option<NaiveDate>,
    paused_date: Option<NaiveDate>,
    unpaused_date: Option<NaiveDate>,
    canceled_date: Option<NaiveDate>,
    version: i64,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = RepositoryError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status: SubscriptionStatus = row
            .status
            .parse()
            .map_err(RepositoryError::InvalidRecord)?;

        Ok(Subscription {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            start_date: row.start_date,
            end_date: row.end_date,
            duration_days: days_from_column(row.duration_days)?,
            price: money_from_column(row.price)?,
            tax: money_from_column(row.tax)?,
            total_price: money_from_column(row.total_price)?,
            status,
            trial_start_date: row.trial_start_date,
            trial_end_date: row.trial_end_date,
            paused_date: row.paused_date,
            unpaused_date: row.unpaused_date,
            canceled_date: row.canceled_date,
            version: row.version,
        })
    }
}

fn money_from_column(value: Decimal) -> Result<Money, RepositoryError> {
    Money::new(value).map_err(|e| RepositoryError::InvalidRecord(e.to_string()))
}

fn days_from_column(value: i32) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::InvalidRecord(format!("negative duration: {}", value)))
}

fn days_to_column(value: u32) -> Result<i32, RepositoryError> {
    i32::try_from(value)
        .map_err(|_| RepositoryError::InvalidRecord(format!("duration too large: {}", value)))
}

/// Repository over a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn get_user(&self, user_id: Uuid) -> Result<User, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, second_name, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::from)
            .ok_or_else(|| RepositoryError::not_found(Entity::User, user_id))
    }

    async fn get_product(&self, product_id: Uuid) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, duration_days, price, tax, total_price
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| RepositoryError::not_found(Entity::Product, product_id))?
            .try_into()
    }

    async fn get_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, duration_days, price, tax, total_price
            FROM products
            ORDER BY duration_days, name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn get_voucher_by_code(&self, code: &str) -> Result<Voucher, RepositoryError> {
        let row: Option<VoucherRow> = sqlx::query_as(
            r#"
            SELECT id, code, discount_type, discount_value
            FROM vouchers
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| RepositoryError::not_found(Entity::Voucher, code))?
            .try_into()
    }

    async fn get_subscription(&self, subscription_id: Uuid) -> Result<Subscription, RepositoryError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, product_id, start_date, end_date, duration_days,
                   price, tax, total_price, status,
                   trial_start_date, trial_end_date, paused_date, unpaused_date, canceled_date,
                   version
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(subscription_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| RepositoryError::not_found(Entity::Subscription, subscription_id))?
            .try_into()
    }

    async fn save_subscription(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, user_id, product_id, start_date, end_date, duration_days,
                price, tax, total_price, status,
                trial_start_date, trial_end_date, paused_date, unpaused_date, canceled_date,
                version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(subscription.id())
        .bind(subscription.user_id())
        .bind(subscription.product_id())
        .bind(subscription.start_date())
        .bind(subscription.end_date())
        .bind(days_to_column(subscription.duration_days())?)
        .bind(subscription.price().value())
        .bind(subscription.tax().value())
        .bind(subscription.total_price().value())
        .bind(subscription.status().as_str())
        .bind(subscription.trial_start_date())
        .bind(subscription.trial_end_date())
        .bind(subscription.paused_date())
        .bind(subscription.unpaused_date())
        .bind(subscription.canceled_date())
        .bind(subscription.version())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_subscription(&self, subscription: &Subscription) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = $3,
                paused_date = $4,
                unpaused_date = $5,
                canceled_date = $6,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(subscription.id())
        .bind(subscription.version())
        .bind(subscription.status().as_str())
        .bind(subscription.paused_date())
        .bind(subscription.unpaused_date())
        .bind(subscription.canceled_date())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a vanished row from a concurrent writer
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM subscriptions WHERE id = $1)")
                    .bind(subscription.id())
                    .fetch_one(&self.pool)
                    .await?;

            return Err(if exists {
                RepositoryError::VersionConflict {
                    subscription_id: subscription.id(),
                    expected: subscription.version(),
                }
            } else {
                RepositoryError::not_found(Entity::Subscription, subscription.id())
            });
        }

        Ok(())
    }
}
