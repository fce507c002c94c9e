//! Projects and the per-user project quota.
//!
//! The quota comes from the user's active subscription plan. Users without one fall
//! back to the free quota from configuration.

use tracing::instrument;

use crate::{
    db::{
        models::projects::{ProjectCreateDBRequest, ProjectDBResponse},
        store::Store,
    },
    services::{Result, ServiceError, subscriptions::get_current_subscription},
    types::{ProjectId, Resource, UserId},
};

/// Maximum number of projects `user_id` may own right now
#[instrument(skip(store), err)]
pub async fn effective_quota(store: &dyn Store, user_id: UserId, free_quota: u32) -> Result<i64> {
    match get_current_subscription(store, user_id).await? {
        Some(current) => Ok(current.plan.projects_quota),
        None => Ok(i64::from(free_quota)),
    }
}

/// The caller's projects, newest first
#[instrument(skip(store), err)]
pub async fn list_projects(store: &dyn Store, user_id: UserId) -> Result<Vec<ProjectDBResponse>> {
    Ok(store.list_projects(user_id).await?)
}

/// Create a project if the owner is below their quota.
#[instrument(skip(store, description), err)]
pub async fn create_project(
    store: &dyn Store,
    free_quota: u32,
    user_id: UserId,
    name: String,
    description: Option<String>,
) -> Result<ProjectDBResponse> {
    let limit = effective_quota(store, user_id, free_quota).await?;
    let count = store.count_projects(user_id).await?;

    if count >= limit {
        tracing::debug!(count, limit, "Project quota reached");
        return Err(ServiceError::QuotaExceeded { limit });
    }

    let project = store
        .create_project(&ProjectCreateDBRequest {
            owner_id: user_id,
            name,
            description,
        })
        .await?;

    Ok(project)
}

/// Delete a project owned by `user_id`.
#[instrument(skip(store), err)]
pub async fn delete_project(store: &dyn Store, user_id: UserId, project_id: ProjectId) -> Result<()> {
    let project = store
        .get_project(project_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Resource::Project, project_id))?;

    if project.owner_id != user_id {
        return Err(ServiceError::forbidden(Resource::Project, project_id));
    }

    if !store.delete_project(project_id).await? {
        // Removed concurrently
        return Err(ServiceError::not_found(Resource::Project, project_id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::store::InMemoryStore,
        payment_providers::dummy::DummyProvider,
        services::subscriptions::{cancel_current_subscription, create_subscription},
        test_utils::create_test_user,
    };
    use rstest::rstest;

    const FREE_QUOTA: u32 = 3;

    async fn subscribe(store: &InMemoryStore, user_id: UserId, plan: &str) {
        let plan_id = store.get_plan_by_name(plan).await.unwrap().unwrap().id;
        create_subscription(store, &DummyProvider::new("usd"), user_id, plan_id, None)
            .await
            .unwrap();
    }

    async fn create_n(store: &InMemoryStore, user_id: UserId, n: i64) {
        for i in 0..n {
            create_project(store, FREE_QUOTA, user_id, format!("project {i}"), None)
                .await
                .unwrap_or_else(|e| panic!("project {i} should fit in quota: {e}"));
        }
    }

    #[rstest]
    #[case::free(None, 3)]
    #[case::free_plan(Some("free"), 3)]
    #[case::pro(Some("pro"), 10)]
    #[tokio::test]
    async fn test_quota_boundary(#[case] plan: Option<&str>, #[case] quota: i64) {
        let store = InMemoryStore::new();
        let user = create_test_user(&store, "quota@example.com").await;
        if let Some(plan) = plan {
            subscribe(&store, user.id, plan).await;
        }

        assert_eq!(effective_quota(&store, user.id, FREE_QUOTA).await.unwrap(), quota);

        create_n(&store, user.id, quota).await;

        let err = create_project(&store, FREE_QUOTA, user.id, "one too many".to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::QuotaExceeded { limit } if limit == quota));
        assert_eq!(store.count_projects(user.id).await.unwrap(), quota);
    }

    #[tokio::test]
    async fn test_free_quota_from_config() {
        let store = InMemoryStore::new();
        let user = create_test_user(&store, "configured@example.com").await;

        create_project(&store, 1, user.id, "only".to_string(), None).await.unwrap();
        let err = create_project(&store, 1, user.id, "second".to_string(), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::QuotaExceeded { limit: 1 }));
    }

    #[tokio::test]
    async fn test_cancel_keeps_projects_but_restores_free_quota() {
        let store = InMemoryStore::new();
        let user = create_test_user(&store, "downgrade@example.com").await;
        subscribe(&store, user.id, "pro").await;
        create_n(&store, user.id, 5).await;

        cancel_current_subscription(&store, user.id).await.unwrap();

        assert_eq!(list_projects(&store, user.id).await.unwrap().len(), 5);
        assert_eq!(effective_quota(&store, user.id, FREE_QUOTA).await.unwrap(), 3);
        assert!(matches!(
            create_project(&store, FREE_QUOTA, user.id, "sixth".to_string(), None).await,
            Err(ServiceError::QuotaExceeded { limit: 3 })
        ));
    }

    #[tokio::test]
    async fn test_quota_counts_only_own_projects() {
        let store = InMemoryStore::new();
        let alice = create_test_user(&store, "alice@example.com").await;
        let bob = create_test_user(&store, "bob@example.com").await;
        create_n(&store, alice.id, 3).await;

        create_project(&store, FREE_QUOTA, bob.id, "bob's".to_string(), None).await.unwrap();
        assert_eq!(list_projects(&store, bob.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_checks_owner() {
        let store = InMemoryStore::new();
        let owner = create_test_user(&store, "owner@example.com").await;
        let other = create_test_user(&store, "other@example.com").await;
        let project = create_project(&store, FREE_QUOTA, owner.id, "mine".to_string(), None)
            .await
            .unwrap();

        let err = delete_project(&store, other.id, project.id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Forbidden {
                resource: Resource::Project,
                ..
            }
        ));
        assert!(store.get_project(project.id).await.unwrap().is_some());

        delete_project(&store, owner.id, project.id).await.unwrap();
        assert!(matches!(
            delete_project(&store, owner.id, project.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
