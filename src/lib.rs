//! Subscription service library
//!
//! Re-exports modules for integration testing and the server binary.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod repository;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorResponse};
pub use state::AppState;
pub use domain::{DomainError, Money, MoneyError, OperationContext, TransitionError};
