//! Repository error types

use std::fmt;

use uuid::Uuid;

/// Kinds of stored records, used for not-found reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Product,
    Voucher,
    Subscription,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::User => "user",
            Entity::Product => "product",
            Entity::Voucher => "voucher",
            Entity::Subscription => "subscription",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("Version conflict on subscription {subscription_id}: expected version {expected}")]
    VersionConflict { subscription_id: Uuid, expected: i64 },

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: Entity, id: String },

    /// A stored row cannot be turned back into a domain value
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    pub fn not_found(entity: Entity, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = RepositoryError::not_found(Entity::Voucher, "SUMMER25");
        assert_eq!(err.to_string(), "voucher not found: SUMMER25");
    }

    #[test]
    fn test_version_conflict_message() {
        let id = Uuid::nil();
        let err = RepositoryError::VersionConflict {
            subscription_id: id,
            expected: 3,
        };
        assert!(err.to_string().contains("expected version 3"));
    }
}
