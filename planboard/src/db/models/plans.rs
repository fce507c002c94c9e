//! Database models for the plan catalog.

use crate::types::PlanId;
use chrono::{DateTime, Utc};

/// Name of the plan users fall back to when they hold no active subscription
pub const FREE_PLAN_NAME: &str = "free";

/// Database representation of a plan. Plans are seeded by migration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PlanDBResponse {
    pub id: PlanId,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    /// Monthly price in minor currency units (cents)
    pub price_monthly: i64,
    pub projects_quota: i64,
    pub created_at: DateTime<Utc>,
}
