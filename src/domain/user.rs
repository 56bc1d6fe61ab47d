//! User record
//!
//! Users are owned by an external administration process; the service only
//! reads them to attach subscriptions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
}
