//! Database repository for tasks.

use crate::{
    db::{
        errors::Result,
        models::tasks::{TaskCreateDBRequest, TaskDBResponse, TaskUpdateDBRequest},
    },
    types::{TaskId, UserId},
};
use sqlx::PgConnection;
use tracing::instrument;

const TASK_COLUMNS: &str = "id, owner_id, title, description, done, created_at, updated_at";

pub struct Tasks<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Tasks<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(owner_id = request.owner_id), err)]
    pub async fn create(&mut self, request: &TaskCreateDBRequest) -> Result<TaskDBResponse> {
        let task = sqlx::query_as::<_, TaskDBResponse>(&format!(
            "INSERT INTO tasks (owner_id, title, description, done) VALUES ($1, $2, $3, $4) RETURNING {TASK_COLUMNS}"
        ))
        .bind(request.owner_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.done)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(task)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: TaskId) -> Result<Option<TaskDBResponse>> {
        let task = sqlx::query_as::<_, TaskDBResponse>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(task)
    }

    /// A page of a user's tasks, newest first
    #[instrument(skip(self), err)]
    pub async fn list_for_owner(&mut self, owner_id: UserId, skip: i64, take: i64) -> Result<Vec<TaskDBResponse>> {
        let tasks = sqlx::query_as::<_, TaskDBResponse>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE owner_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(owner_id)
        .bind(take)
        .bind(skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(tasks)
    }

    #[instrument(skip(self, request), err)]
    pub async fn update(&mut self, id: TaskId, request: &TaskUpdateDBRequest) -> Result<Option<TaskDBResponse>> {
        let task = sqlx::query_as::<_, TaskDBResponse>(&format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                done = COALESCE($4, done),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.done)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(task)
    }

    /// Returns true if a row was deleted
    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
