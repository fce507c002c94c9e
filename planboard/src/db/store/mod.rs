//! Storage abstraction used by the service layer.
//!
//! [`Store`] groups every persistence operation the application needs behind one
//! object-safe trait so the HTTP layer can hold an `Arc<dyn Store>`. Two
//! implementations exist:
//!
//! - [`postgres::PostgresStore`]: production backend, delegates to the repositories in
//!   [`crate::db::handlers`] and runs multi-row writes in a transaction
//! - [`in_memory::InMemoryStore`]: lock-protected maps with the same invariants, used by
//!   tests and for running without a database
//!
//! Both enforce the invariants the service layer relies on:
//!
//! - at most one active subscription per user; a second insert fails with a
//!   [`DbError::UniqueViolation`](crate::db::errors::DbError::UniqueViolation) on
//!   [`ONE_ACTIVE_SUBSCRIPTION_CONSTRAINT`](crate::db::errors::ONE_ACTIVE_SUBSCRIPTION_CONSTRAINT)
//! - a subscription and its invoice are written together or not at all
//! - user emails are unique

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    db::{
        errors::Result,
        models::{
            invoices::{InvoiceDBResponse, InvoiceDraft},
            plans::PlanDBResponse,
            projects::{ProjectCreateDBRequest, ProjectDBResponse},
            subscriptions::{SubscriptionCreateDBRequest, SubscriptionDBResponse},
            tasks::{TaskCreateDBRequest, TaskDBResponse, TaskUpdateDBRequest},
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
    types::{PlanId, ProjectId, SubscriptionId, TaskId, UserId},
};

pub mod in_memory;
pub mod postgres;

#[cfg(test)]
mod tests;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

#[async_trait]
pub trait Store: Send + Sync {
    // Plan catalog

    /// All plans ordered by ascending monthly price
    async fn list_plans(&self) -> Result<Vec<PlanDBResponse>>;

    async fn get_plan(&self, id: PlanId) -> Result<Option<PlanDBResponse>>;

    /// Exact-case lookup by plan name
    async fn get_plan_by_name(&self, name: &str) -> Result<Option<PlanDBResponse>>;

    // Users

    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse>;

    async fn get_user(&self, id: UserId) -> Result<Option<UserDBResponse>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDBResponse>>;

    // Subscriptions and invoices

    async fn get_subscription(&self, id: SubscriptionId) -> Result<Option<SubscriptionDBResponse>>;

    /// The user's most recently created active subscription
    async fn get_active_subscription(&self, user_id: UserId) -> Result<Option<SubscriptionDBResponse>>;

    /// Create an active subscription and its invoice in one unit of work
    async fn create_subscription_with_invoice(
        &self,
        request: &SubscriptionCreateDBRequest,
        invoice: &InvoiceDraft,
    ) -> Result<(SubscriptionDBResponse, InvoiceDBResponse)>;

    /// Cancel an active subscription. `None` if it does not exist or is not active.
    async fn cancel_subscription(&self, id: SubscriptionId, ended_at: DateTime<Utc>) -> Result<Option<SubscriptionDBResponse>>;

    /// Expire active subscriptions whose end date is at or before `now`; returns how many changed
    async fn expire_subscriptions(&self, now: DateTime<Utc>) -> Result<u64>;

    async fn list_invoices(&self, subscription_id: SubscriptionId) -> Result<Vec<InvoiceDBResponse>>;

    // Projects

    async fn create_project(&self, request: &ProjectCreateDBRequest) -> Result<ProjectDBResponse>;

    async fn get_project(&self, id: ProjectId) -> Result<Option<ProjectDBResponse>>;

    /// Projects owned by a user, newest first
    async fn list_projects(&self, owner_id: UserId) -> Result<Vec<ProjectDBResponse>>;

    async fn count_projects(&self, owner_id: UserId) -> Result<i64>;

    /// Returns true if the project existed
    async fn delete_project(&self, id: ProjectId) -> Result<bool>;

    // Tasks

    async fn create_task(&self, request: &TaskCreateDBRequest) -> Result<TaskDBResponse>;

    async fn get_task(&self, id: TaskId) -> Result<Option<TaskDBResponse>>;

    /// A page of a user's tasks, newest first
    async fn list_tasks(&self, owner_id: UserId, skip: i64, take: i64) -> Result<Vec<TaskDBResponse>>;

    async fn update_task(&self, id: TaskId, request: &TaskUpdateDBRequest) -> Result<Option<TaskDBResponse>>;

    /// Returns true if the task existed
    async fn delete_task(&self, id: TaskId) -> Result<bool>;
}
