use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::{
        handlers::{JsonBody, parse_id},
        models::projects::{ProjectCreate, ProjectResponse},
    },
    auth::current_user::CurrentUser,
    errors::Error,
    i18n::Message,
    services::projects,
    types::Resource,
};

/// List the caller's projects
#[utoipa::path(
    get,
    path = "/projects",
    tag = "projects",
    summary = "List projects",
    responses(
        (status = 200, description = "The caller's projects, newest first", body = [ProjectResponse]),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_projects(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Vec<ProjectResponse>>, Error> {
    let projects = projects::list_projects(state.store.as_ref(), user.id).await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

/// Create a project
#[utoipa::path(
    post,
    path = "/projects",
    request_body = ProjectCreate,
    tag = "projects",
    summary = "Create project",
    description = "Fails with 403 and the current `limit` once the caller owns as many projects as their plan allows.",
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Missing project name", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "Plan limit reached", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_project(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<ProjectCreate>,
) -> Result<(StatusCode, Json<ProjectResponse>), Error> {
    if request.name.is_empty() {
        return Err(Error::bad_request(Message::ProjectNameRequired));
    }

    let project = projects::create_project(
        state.store.as_ref(),
        state.config.subscriptions.free_quota,
        user.id,
        request.name,
        request.description,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Delete a project
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    tag = "projects",
    summary = "Delete project",
    params(
        ("id" = i64, Path, description = "Project ID"),
    ),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 400, description = "Invalid project ID", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "Project belongs to another user", body = crate::errors::ErrorBody),
        (status = 404, description = "Project not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_project(State(state): State<AppState>, user: CurrentUser, Path(id): Path<String>) -> Result<StatusCode, Error> {
    let project_id = parse_id(&id, Resource::Project)?;
    projects::delete_project(state.store.as_ref(), user.id, project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
