//! Command Handlers module
//!
//! Handlers orchestrate business operations: they load records through the
//! repository port, run domain logic, and persist the outcome.

mod commands;
mod product_handler;
mod subscribe_handler;
mod subscription_handler;


pub use commands::*;
pub use product_handler::ProductHandler;
pub use subscribe_handler::SubscribeHandler;
pub use subscription_handler::SubscriptionHandler;
