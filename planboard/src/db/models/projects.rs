//! Database models for projects.

use crate::types::{ProjectId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a new project
#[derive(Debug, Clone)]
pub struct ProjectCreateDBRequest {
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
}

/// Database response for a project
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProjectDBResponse {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
