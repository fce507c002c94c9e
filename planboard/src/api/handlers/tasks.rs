use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::{
        handlers::{JsonBody, parse_id},
        models::{
            pagination::Pagination,
            tasks::{TaskCreate, TaskResponse, TaskUpdate},
        },
    },
    auth::current_user::CurrentUser,
    db::models::tasks::TaskCreateDBRequest,
    errors::Error,
    i18n::Message,
    services::tasks,
    types::Resource,
};

fn require_title(title: &str) -> Result<(), Error> {
    if title.is_empty() {
        return Err(Error::bad_request(Message::TaskTitleRequired));
    }
    Ok(())
}

/// Create a task
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = TaskCreate,
    tag = "tasks",
    summary = "Create task",
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Missing title", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_task(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<TaskCreate>,
) -> Result<(StatusCode, Json<TaskResponse>), Error> {
    require_title(&request.title)?;

    let task = tasks::create_task(
        state.store.as_ref(),
        &TaskCreateDBRequest {
            owner_id: user.id,
            title: request.title,
            description: request.description,
            done: request.done,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// List the caller's tasks
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    summary = "List tasks",
    params(Pagination),
    responses(
        (status = 200, description = "A page of tasks, newest first", body = [TaskResponse]),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_tasks(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<TaskResponse>>, Error> {
    let (skip, take) = pagination.params();
    let tasks = tasks::list_tasks(state.store.as_ref(), user.id, skip, take).await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Get a task
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    summary = "Get task",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "The task", body = TaskResponse),
        (status = 403, description = "Task belongs to another user", body = crate::errors::ErrorBody),
        (status = 404, description = "Task not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_task(State(state): State<AppState>, user: CurrentUser, Path(id): Path<String>) -> Result<Json<TaskResponse>, Error> {
    let task_id = parse_id(&id, Resource::Task)?;
    let task = tasks::get_task(state.store.as_ref(), user.id, task_id).await?;
    Ok(Json(task.into()))
}

/// Update a task
#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    request_body = TaskUpdate,
    tag = "tasks",
    summary = "Update task",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Updated task", body = TaskResponse),
        (status = 400, description = "Empty title", body = crate::errors::ErrorBody),
        (status = 403, description = "Task belongs to another user", body = crate::errors::ErrorBody),
        (status = 404, description = "Task not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<TaskUpdate>,
) -> Result<Json<TaskResponse>, Error> {
    let task_id = parse_id(&id, Resource::Task)?;
    if let Some(title) = &update.title {
        require_title(title)?;
    }

    let task = tasks::update_task(state.store.as_ref(), user.id, task_id, &update.into()).await?;
    Ok(Json(task.into()))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "tasks",
    summary = "Delete task",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 403, description = "Task belongs to another user", body = crate::errors::ErrorBody),
        (status = 404, description = "Task not found", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_task(State(state): State<AppState>, user: CurrentUser, Path(id): Path<String>) -> Result<StatusCode, Error> {
    let task_id = parse_id(&id, Resource::Task)?;
    tasks::delete_task(state.store.as_ref(), user.id, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
