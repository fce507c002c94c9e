//! Database repository for projects.

use crate::{
    db::{
        errors::Result,
        models::projects::{ProjectCreateDBRequest, ProjectDBResponse},
    },
    types::{ProjectId, UserId},
};
use sqlx::PgConnection;
use tracing::instrument;

const PROJECT_COLUMNS: &str = "id, owner_id, name, description, created_at, updated_at";

pub struct Projects<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Projects<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(owner_id = request.owner_id), err)]
    pub async fn create(&mut self, request: &ProjectCreateDBRequest) -> Result<ProjectDBResponse> {
        let project = sqlx::query_as::<_, ProjectDBResponse>(&format!(
            "INSERT INTO projects (owner_id, name, description) VALUES ($1, $2, $3) RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(request.owner_id)
        .bind(&request.name)
        .bind(&request.description)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(project)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: ProjectId) -> Result<Option<ProjectDBResponse>> {
        let project = sqlx::query_as::<_, ProjectDBResponse>(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(project)
    }

    /// Projects owned by a user, newest first
    #[instrument(skip(self), err)]
    pub async fn list_for_owner(&mut self, owner_id: UserId) -> Result<Vec<ProjectDBResponse>> {
        let projects = sqlx::query_as::<_, ProjectDBResponse>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(projects)
    }

    #[instrument(skip(self), err)]
    pub async fn count_for_owner(&mut self, owner_id: UserId) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }

    /// Returns true if a row was deleted
    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: ProjectId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
