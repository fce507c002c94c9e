//! Database models for tasks.

use crate::types::{TaskId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a new task
#[derive(Debug, Clone)]
pub struct TaskCreateDBRequest {
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
}

/// Database request for updating a task; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct TaskUpdateDBRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
}

/// Database response for a task
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TaskDBResponse {
    pub id: TaskId,
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
