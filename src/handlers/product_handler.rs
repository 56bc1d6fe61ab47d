//! Product Handler
//!
//! Read-only catalog queries, with optional voucher pricing.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Product;
use crate::error::AppError;
use crate::repository::Repository;
use crate::state::AppState;

pub struct ProductHandler {
    repository: Arc<dyn Repository>,
}

impl ProductHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: state.repository.clone(),
        }
    }

    pub async fn find_product(&self, product_id: Uuid) -> Result<Product, AppError> {
        Ok(self.repository.get_product(product_id).await?)
    }

    pub async fn find_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.repository.get_products().await?)
    }

    /// Every catalog product priced with the voucher.
    ///
    /// The voucher must exist even when the catalog is empty. A pricing
    /// failure on any product fails the whole call.
    pub async fn find_products_with_voucher(&self, voucher_code: &str) -> Result<Vec<Product>, AppError> {
        let voucher = self.repository.get_voucher_by_code(voucher_code).await?;
        let products = self.repository.get_products().await?;

        products
            .iter()
            .map(|product| {
                product.with_voucher(&voucher).map_err(|e| {
                    tracing::warn!(
                        product_id = %product.id,
                        voucher_code = %voucher.code,
                        reason = %e,
                        "Voucher cannot be applied to product"
                    );
                    AppError::from(e)
                })
            })
            .collect()
    }
}
