//! Subscription requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::plans::PlanSummary;
use crate::{
    db::models::subscriptions::SubscriptionStatus,
    services::subscriptions::SubscriptionWithPlan,
    types::{PlanId, SubscriptionId, UserId},
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub plan_id: PlanId,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub plan: PlanSummary,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    /// Set for fixed-term subscriptions and once cancelled
    pub end_date: Option<DateTime<Utc>>,
}

impl From<SubscriptionWithPlan> for SubscriptionResponse {
    fn from(SubscriptionWithPlan { subscription, plan }: SubscriptionWithPlan) -> Self {
        Self {
            id: subscription.id,
            user_id: subscription.user_id,
            plan_id: subscription.plan_id,
            plan: plan.into(),
            status: subscription.status,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateSubscriptionResponse {
    pub message: String,
    pub subscription: SubscriptionResponse,
}
