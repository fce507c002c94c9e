//! Task payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    db::models::tasks::{TaskDBResponse, TaskUpdateDBRequest},
    types::TaskId,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TaskCreate {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub done: bool,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
}

impl From<TaskUpdate> for TaskUpdateDBRequest {
    fn from(update: TaskUpdate) -> Self {
        Self {
            title: update.title,
            description: update.description,
            done: update.done,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskDBResponse> for TaskResponse {
    fn from(db: TaskDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            description: db.description,
            done: db.done,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
