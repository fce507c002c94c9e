//! Database repository for subscriptions.

use crate::{
    db::{
        errors::Result,
        models::subscriptions::{SubscriptionCreateDBRequest, SubscriptionDBResponse, SubscriptionStatus},
    },
    types::{SubscriptionId, UserId},
};
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::instrument;

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, plan_id, status, start_date, end_date, created_at";

pub struct Subscriptions<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Subscriptions<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert an active subscription. A second active row for the same user violates
    /// `subscriptions_one_active_per_user`.
    #[instrument(skip(self, request), fields(user_id = request.user_id, plan_id = request.plan_id), err)]
    pub async fn create(&mut self, request: &SubscriptionCreateDBRequest) -> Result<SubscriptionDBResponse> {
        let subscription = sqlx::query_as::<_, SubscriptionDBResponse>(&format!(
            "INSERT INTO subscriptions (user_id, plan_id, status, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(request.user_id)
        .bind(request.plan_id)
        .bind(SubscriptionStatus::Active)
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(subscription)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: SubscriptionId) -> Result<Option<SubscriptionDBResponse>> {
        let subscription = sqlx::query_as::<_, SubscriptionDBResponse>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(subscription)
    }

    /// Most recently created active subscription for a user
    #[instrument(skip(self), err)]
    pub async fn get_active_for_user(&mut self, user_id: UserId) -> Result<Option<SubscriptionDBResponse>> {
        let subscription = sqlx::query_as::<_, SubscriptionDBResponse>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions
             WHERE user_id = $1 AND status = $2
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        ))
        .bind(user_id)
        .bind(SubscriptionStatus::Active)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(subscription)
    }

    /// Mark an active subscription cancelled. Returns `None` if it is missing or no longer active.
    #[instrument(skip(self), err)]
    pub async fn cancel(&mut self, id: SubscriptionId, ended_at: DateTime<Utc>) -> Result<Option<SubscriptionDBResponse>> {
        let subscription = sqlx::query_as::<_, SubscriptionDBResponse>(&format!(
            "UPDATE subscriptions SET status = $2, end_date = $3
             WHERE id = $1 AND status = $4
             RETURNING {SUBSCRIPTION_COLUMNS}"
        ))
        .bind(id)
        .bind(SubscriptionStatus::Cancelled)
        .bind(ended_at)
        .bind(SubscriptionStatus::Active)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(subscription)
    }

    /// Move every active subscription whose end date has passed to `expired`
    #[instrument(skip(self), err)]
    pub async fn expire_due(&mut self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE subscriptions SET status = $1
             WHERE status = $2 AND end_date IS NOT NULL AND end_date <= $3",
        )
        .bind(SubscriptionStatus::Expired)
        .bind(SubscriptionStatus::Active)
        .bind(now)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected())
    }
}
