//! Per-user tasks. Every operation is scoped to the caller.

use tracing::instrument;

use crate::{
    db::{
        models::tasks::{TaskCreateDBRequest, TaskDBResponse, TaskUpdateDBRequest},
        store::Store,
    },
    services::{Result, ServiceError},
    types::{Resource, TaskId, UserId},
};

#[instrument(skip(store, request), fields(owner_id = request.owner_id), err)]
pub async fn create_task(store: &dyn Store, request: &TaskCreateDBRequest) -> Result<TaskDBResponse> {
    Ok(store.create_task(request).await?)
}

/// A page of the caller's tasks, newest first
#[instrument(skip(store), err)]
pub async fn list_tasks(store: &dyn Store, user_id: UserId, skip: i64, take: i64) -> Result<Vec<TaskDBResponse>> {
    Ok(store.list_tasks(user_id, skip, take).await?)
}

/// Fetch a task, failing if it is missing or owned by someone else
#[instrument(skip(store), err)]
pub async fn get_task(store: &dyn Store, user_id: UserId, task_id: TaskId) -> Result<TaskDBResponse> {
    let task = store
        .get_task(task_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Resource::Task, task_id))?;

    if task.owner_id != user_id {
        return Err(ServiceError::forbidden(Resource::Task, task_id));
    }
    Ok(task)
}

#[instrument(skip(store, request), err)]
pub async fn update_task(store: &dyn Store, user_id: UserId, task_id: TaskId, request: &TaskUpdateDBRequest) -> Result<TaskDBResponse> {
    get_task(store, user_id, task_id).await?;

    store
        .update_task(task_id, request)
        .await?
        .ok_or_else(|| ServiceError::not_found(Resource::Task, task_id))
}

#[instrument(skip(store), err)]
pub async fn delete_task(store: &dyn Store, user_id: UserId, task_id: TaskId) -> Result<()> {
    get_task(store, user_id, task_id).await?;

    if !store.delete_task(task_id).await? {
        return Err(ServiceError::not_found(Resource::Task, task_id));
    }
    Ok(())
}
