//! In-memory [`Store`] implementation.
//!
//! All tables live behind a single lock so multi-row writes (subscription plus invoice)
//! and uniqueness checks are atomic. Suitable for tests and single-process runs; data is
//! lost on restart. The plan catalog is seeded on construction with the same rows as the
//! initial migration.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::Store;
use crate::{
    db::{
        errors::{DbError, ONE_ACTIVE_SUBSCRIPTION_CONSTRAINT, Result},
        models::{
            invoices::{InvoiceDBResponse, InvoiceDraft},
            plans::PlanDBResponse,
            projects::{ProjectCreateDBRequest, ProjectDBResponse},
            subscriptions::{SubscriptionCreateDBRequest, SubscriptionDBResponse, SubscriptionStatus},
            tasks::{TaskCreateDBRequest, TaskDBResponse, TaskUpdateDBRequest},
            users::{UserCreateDBRequest, UserDBResponse},
        },
    },
    types::{InvoiceId, PlanId, ProjectId, SubscriptionId, TaskId, UserId},
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    plans: BTreeMap<PlanId, PlanDBResponse>,
    users: BTreeMap<UserId, UserDBResponse>,
    subscriptions: BTreeMap<SubscriptionId, SubscriptionDBResponse>,
    invoices: BTreeMap<InvoiceId, InvoiceDBResponse>,
    projects: BTreeMap<ProjectId, ProjectDBResponse>,
    tasks: BTreeMap<TaskId, TaskDBResponse>,
}

impl Tables {
    /// Ids are shared across tables; only uniqueness and monotonicity matter.
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_user(&self, user_id: UserId, table: &str) -> Result<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(DbError::ForeignKeyViolation {
                constraint: Some(format!("{table}_user_fkey")),
                table: Some(table.to_string()),
                message: format!("user {user_id} does not exist"),
            })
        }
    }
}

fn seeded_plans() -> Vec<PlanDBResponse> {
    let now = Utc::now();
    vec![
        PlanDBResponse {
            id: 1,
            name: "free".to_string(),
            display_name: "Free Plan".to_string(),
            description: Some("Get started with up to 3 projects".to_string()),
            price_monthly: 0,
            projects_quota: 3,
            created_at: now,
        },
        PlanDBResponse {
            id: 2,
            name: "pro".to_string(),
            display_name: "Pro Plan".to_string(),
            description: Some("Grow your team with up to 10 projects".to_string()),
            price_monthly: 999,
            projects_quota: 10,
            created_at: now,
        },
    ]
}

/// In-memory implementation of the [`Store`] trait.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create a store with the default plan catalog.
    pub fn new() -> Self {
        Self::with_plans(seeded_plans())
    }

    /// Create a store with a custom plan catalog.
    pub fn with_plans(plans: Vec<PlanDBResponse>) -> Self {
        let mut tables = Tables::default();
        for plan in plans {
            tables.next_id = tables.next_id.max(plan.id);
            tables.plans.insert(plan.id, plan);
        }
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_plans(&self) -> Result<Vec<PlanDBResponse>> {
        let tables = self.tables.read();
        let mut plans: Vec<_> = tables.plans.values().cloned().collect();
        plans.sort_by_key(|p| (p.price_monthly, p.id));
        Ok(plans)
    }

    async fn get_plan(&self, id: PlanId) -> Result<Option<PlanDBResponse>> {
        Ok(self.tables.read().plans.get(&id).cloned())
    }

    async fn get_plan_by_name(&self, name: &str) -> Result<Option<PlanDBResponse>> {
        Ok(self.tables.read().plans.values().find(|p| p.name == name).cloned())
    }

    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut tables = self.tables.write();

        if tables.users.values().any(|u| u.email == request.email) {
            return Err(DbError::UniqueViolation {
                constraint: Some("users_email_key".to_string()),
                table: Some("users".to_string()),
                message: format!("email {} already exists", request.email),
            });
        }

        let now = Utc::now();
        let user = UserDBResponse {
            id: tables.next_id(),
            email: request.email.clone(),
            password_hash: request.password_hash.clone(),
            name: request.name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDBResponse>> {
        Ok(self.tables.read().users.values().find(|u| u.email == email).cloned())
    }

    async fn get_subscription(&self, id: SubscriptionId) -> Result<Option<SubscriptionDBResponse>> {
        Ok(self.tables.read().subscriptions.get(&id).cloned())
    }

    async fn get_active_subscription(&self, user_id: UserId) -> Result<Option<SubscriptionDBResponse>> {
        let tables = self.tables.read();
        Ok(tables
            .subscriptions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active())
            .max_by_key(|s| (s.created_at, s.id))
            .cloned())
    }

    async fn create_subscription_with_invoice(
        &self,
        request: &SubscriptionCreateDBRequest,
        invoice: &InvoiceDraft,
    ) -> Result<(SubscriptionDBResponse, InvoiceDBResponse)> {
        let mut tables = self.tables.write();

        tables.require_user(request.user_id, "subscriptions")?;
        if !tables.plans.contains_key(&request.plan_id) {
            return Err(DbError::ForeignKeyViolation {
                constraint: Some("subscriptions_plan_id_fkey".to_string()),
                table: Some("subscriptions".to_string()),
                message: format!("plan {} does not exist", request.plan_id),
            });
        }
        if tables.subscriptions.values().any(|s| s.user_id == request.user_id && s.is_active()) {
            return Err(DbError::UniqueViolation {
                constraint: Some(ONE_ACTIVE_SUBSCRIPTION_CONSTRAINT.to_string()),
                table: Some("subscriptions".to_string()),
                message: format!("user {} already has an active subscription", request.user_id),
            });
        }

        let now = Utc::now();
        let subscription = SubscriptionDBResponse {
            id: tables.next_id(),
            user_id: request.user_id,
            plan_id: request.plan_id,
            status: SubscriptionStatus::Active,
            start_date: request.start_date,
            end_date: request.end_date,
            created_at: now,
        };
        let invoice = InvoiceDBResponse {
            id: tables.next_id(),
            subscription_id: subscription.id,
            amount: invoice.amount,
            currency: invoice.currency.clone(),
            status: invoice.status.clone(),
            payment_intent_id: invoice.payment_intent_id.clone(),
            created_at: now,
        };

        tables.subscriptions.insert(subscription.id, subscription.clone());
        tables.invoices.insert(invoice.id, invoice.clone());
        Ok((subscription, invoice))
    }

    async fn cancel_subscription(&self, id: SubscriptionId, ended_at: DateTime<Utc>) -> Result<Option<SubscriptionDBResponse>> {
        let mut tables = self.tables.write();
        Ok(tables.subscriptions.get_mut(&id).filter(|s| s.is_active()).map(|s| {
            s.status = SubscriptionStatus::Cancelled;
            s.end_date = Some(ended_at);
            s.clone()
        }))
    }

    async fn expire_subscriptions(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut tables = self.tables.write();
        let mut expired = 0;
        for subscription in tables.subscriptions.values_mut() {
            if subscription.is_active() && subscription.end_date.is_some_and(|end| end <= now) {
                subscription.status = SubscriptionStatus::Expired;
                expired += 1;
            }
        }
        Ok(expired)
    }

    async fn list_invoices(&self, subscription_id: SubscriptionId) -> Result<Vec<InvoiceDBResponse>> {
        let tables = self.tables.read();
        Ok(tables
            .invoices
            .values()
            .filter(|i| i.subscription_id == subscription_id)
            .cloned()
            .collect())
    }

    async fn create_project(&self, request: &ProjectCreateDBRequest) -> Result<ProjectDBResponse> {
        let mut tables = self.tables.write();
        tables.require_user(request.owner_id, "projects")?;

        let now = Utc::now();
        let project = ProjectDBResponse {
            id: tables.next_id(),
            owner_id: request.owner_id,
            name: request.name.clone(),
            description: request.description.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<ProjectDBResponse>> {
        Ok(self.tables.read().projects.get(&id).cloned())
    }

    async fn list_projects(&self, owner_id: UserId) -> Result<Vec<ProjectDBResponse>> {
        let tables = self.tables.read();
        let mut projects: Vec<_> = tables.projects.values().filter(|p| p.owner_id == owner_id).cloned().collect();
        projects.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(projects)
    }

    async fn count_projects(&self, owner_id: UserId) -> Result<i64> {
        let tables = self.tables.read();
        Ok(tables.projects.values().filter(|p| p.owner_id == owner_id).count() as i64)
    }

    async fn delete_project(&self, id: ProjectId) -> Result<bool> {
        Ok(self.tables.write().projects.remove(&id).is_some())
    }

    async fn create_task(&self, request: &TaskCreateDBRequest) -> Result<TaskDBResponse> {
        let mut tables = self.tables.write();
        tables.require_user(request.owner_id, "tasks")?;

        let now = Utc::now();
        let task = TaskDBResponse {
            id: tables.next_id(),
            owner_id: request.owner_id,
            title: request.title.clone(),
            description: request.description.clone(),
            done: request.done,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<TaskDBResponse>> {
        Ok(self.tables.read().tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, owner_id: UserId, skip: i64, take: i64) -> Result<Vec<TaskDBResponse>> {
        let tables = self.tables.read();
        let mut tasks: Vec<_> = tables.tasks.values().filter(|t| t.owner_id == owner_id).cloned().collect();
        tasks.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(tasks
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(take.max(0) as usize)
            .collect())
    }

    async fn update_task(&self, id: TaskId, request: &TaskUpdateDBRequest) -> Result<Option<TaskDBResponse>> {
        let mut tables = self.tables.write();
        Ok(tables.tasks.get_mut(&id).map(|task| {
            if let Some(title) = &request.title {
                task.title = title.clone();
            }
            if let Some(description) = &request.description {
                task.description = Some(description.clone());
            }
            if let Some(done) = request.done {
                task.done = done;
            }
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool> {
        Ok(self.tables.write().tasks.remove(&id).is_some())
    }
}
