//! Business rules on top of the [`Store`](crate::db::store::Store).
//!
//! Each submodule exposes free functions that take the collaborators they need
//! (`&dyn Store`, `&dyn PaymentProvider`, config values) and return a
//! [`ServiceError`] on failure. HTTP handlers call these and convert errors into
//! responses via [`crate::errors::Error`].
//!
//! - [`plans`]: read-only plan catalog
//! - [`subscriptions`]: purchase, lookup and cancellation
//! - [`projects`]: quota-enforced project creation and owner-checked deletion
//! - [`tasks`]: owner-scoped task CRUD
//! - [`expiry`]: periodic expiry of subscriptions past their end date

use thiserror::Error;

use crate::{db::errors::DbError, payment_providers::PaymentError, types::Resource};

pub mod expiry;
pub mod plans;
pub mod projects;
pub mod subscriptions;
pub mod tasks;

/// Failures of service-layer operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The entity does not exist (or is not in a state the operation applies to)
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: Resource, id: String },

    /// The entity exists but belongs to another user
    #[error("{resource} with ID {id} belongs to another user")]
    Forbidden { resource: Resource, id: String },

    #[error("User already has an active subscription")]
    AlreadyActive,

    #[error("Plan {plan_id} does not exist")]
    InvalidPlan { plan_id: i64 },

    /// Project creation would exceed the caller's effective quota
    #[error("Project quota of {limit} reached")]
    QuotaExceeded { limit: i64 },

    #[error(transparent)]
    Store(#[from] DbError),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

impl ServiceError {
    pub(crate) fn not_found(resource: Resource, id: impl ToString) -> Self {
        ServiceError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub(crate) fn forbidden(resource: Resource, id: impl ToString) -> Self {
        ServiceError::Forbidden {
            resource,
            id: id.to_string(),
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, ServiceError>;
