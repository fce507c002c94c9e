use thiserror::Error;

/// Name of the partial unique index that allows one active subscription per user.
pub const ONE_ACTIVE_SUBSCRIPTION_CONSTRAINT: &str = "subscriptions_one_active_per_user";

/// Unified error type for store operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Foreign key constraint violation
    #[error("Foreign key constraint violation")]
    ForeignKeyViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Check constraint violation
    #[error("Check constraint violation")]
    CheckViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DbError {
    /// True when this error is the store rejecting a second active subscription for a user.
    pub fn is_active_subscription_conflict(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { constraint: Some(c), .. } if c == ONE_ACTIVE_SUBSCRIPTION_CONSTRAINT
        )
    }

    /// True when this error is a duplicate user email.
    pub fn is_email_conflict(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { table, constraint, .. }
                if table.as_deref() == Some("users") && constraint.as_deref().is_some_and(|c| c.contains("email"))
        )
    }
}

/// Convert from sqlx::Error using proper sqlx error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    DbError::UniqueViolation {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        table: db_err.table().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        table: db_err.table().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }
                } else if db_err.is_check_violation() {
                    DbError::CheckViolation {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        table: db_err.table().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }
                } else {
                    // All other database errors are non-recoverable
                    DbError::Other(anyhow::Error::from(err))
                }
            }
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Type alias for store operation results
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_subscription_conflict_detection() {
        let err = DbError::UniqueViolation {
            constraint: Some(ONE_ACTIVE_SUBSCRIPTION_CONSTRAINT.to_string()),
            table: Some("subscriptions".to_string()),
            message: "duplicate key".to_string(),
        };
        assert!(err.is_active_subscription_conflict());
        assert!(!err.is_email_conflict());

        let other = DbError::UniqueViolation {
            constraint: Some("plans_name_key".to_string()),
            table: Some("plans".to_string()),
            message: "duplicate key".to_string(),
        };
        assert!(!other.is_active_subscription_conflict());
    }

    #[test]
    fn test_email_conflict_detection() {
        let err = DbError::UniqueViolation {
            constraint: Some("users_email_key".to_string()),
            table: Some("users".to_string()),
            message: "duplicate key".to_string(),
        };
        assert!(err.is_email_conflict());
        assert!(!DbError::NotFound.is_email_conflict());
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(DbError::from(sqlx::Error::RowNotFound), DbError::NotFound));
    }
}
