//! PostgreSQL-backed [`Store`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::Store;
use crate::{
    db::{
        errors::Result,
        handlers::{Invoices, Plans, Projects, Subscriptions, Tasks, Users},
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

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn list_plans(&self) -> Result<Vec<PlanDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Plans::new(&mut conn).list().await
    }

    async fn get_plan(&self, id: PlanId) -> Result<Option<PlanDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Plans::new(&mut conn).get_by_id(id).await
    }

    async fn get_plan_by_name(&self, name: &str) -> Result<Option<PlanDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Plans::new(&mut conn).get_by_name(name).await
    }

    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).create(request).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_user_by_email(email).await
    }

    async fn get_subscription(&self, id: SubscriptionId) -> Result<Option<SubscriptionDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Subscriptions::new(&mut conn).get_by_id(id).await
    }

    async fn get_active_subscription(&self, user_id: UserId) -> Result<Option<SubscriptionDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Subscriptions::new(&mut conn).get_active_for_user(user_id).await
    }

    async fn create_subscription_with_invoice(
        &self,
        request: &SubscriptionCreateDBRequest,
        invoice: &InvoiceDraft,
    ) -> Result<(SubscriptionDBResponse, InvoiceDBResponse)> {
        // Dropping the transaction on any error rolls both rows back
        let mut tx = self.pool.begin().await?;
        let subscription = Subscriptions::new(&mut tx).create(request).await?;
        let invoice = Invoices::new(&mut tx).create(subscription.id, invoice).await?;
        tx.commit().await?;

        Ok((subscription, invoice))
    }

    async fn cancel_subscription(&self, id: SubscriptionId, ended_at: DateTime<Utc>) -> Result<Option<SubscriptionDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Subscriptions::new(&mut conn).cancel(id, ended_at).await
    }

    async fn expire_subscriptions(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        Subscriptions::new(&mut conn).expire_due(now).await
    }

    async fn list_invoices(&self, subscription_id: SubscriptionId) -> Result<Vec<InvoiceDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Invoices::new(&mut conn).list_for_subscription(subscription_id).await
    }

    async fn create_project(&self, request: &ProjectCreateDBRequest) -> Result<ProjectDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Projects::new(&mut conn).create(request).await
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<ProjectDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Projects::new(&mut conn).get_by_id(id).await
    }

    async fn list_projects(&self, owner_id: UserId) -> Result<Vec<ProjectDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Projects::new(&mut conn).list_for_owner(owner_id).await
    }

    async fn count_projects(&self, owner_id: UserId) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        Projects::new(&mut conn).count_for_owner(owner_id).await
    }

    async fn delete_project(&self, id: ProjectId) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        Projects::new(&mut conn).delete(id).await
    }

    async fn create_task(&self, request: &TaskCreateDBRequest) -> Result<TaskDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Tasks::new(&mut conn).create(request).await
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<TaskDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Tasks::new(&mut conn).get_by_id(id).await
    }

    async fn list_tasks(&self, owner_id: UserId, skip: i64, take: i64) -> Result<Vec<TaskDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Tasks::new(&mut conn).list_for_owner(owner_id, skip, take).await
    }

    async fn update_task(&self, id: TaskId, request: &TaskUpdateDBRequest) -> Result<Option<TaskDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Tasks::new(&mut conn).update(id, request).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        Tasks::new(&mut conn).delete(id).await
    }
}
