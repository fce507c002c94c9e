//! Database models for subscriptions.

use crate::types::{PlanId, SubscriptionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Subscription status stored as TEXT in database
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
}

/// Database request for creating a new subscription
#[derive(Debug, Clone)]
pub struct SubscriptionCreateDBRequest {
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub start_date: DateTime<Utc>,
    /// Set when subscriptions run for a fixed term
    pub end_date: Option<DateTime<Utc>>,
}

/// Database response for a subscription
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SubscriptionDBResponse {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SubscriptionDBResponse {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}
