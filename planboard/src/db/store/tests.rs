use chrono::{Duration, Utc};
use rstest::{fixture, rstest};

use crate::db::{
    errors::DbError,
    models::{
        invoices::InvoiceDraft,
        projects::ProjectCreateDBRequest,
        subscriptions::{SubscriptionCreateDBRequest, SubscriptionStatus},
        tasks::{TaskCreateDBRequest, TaskUpdateDBRequest},
        users::{UserCreateDBRequest, UserDBResponse},
    },
    store::{InMemoryStore, Store},
};

#[cfg(feature = "postgres-tests")]
use crate::db::store::PostgresStore;

async fn create_user<S: Store>(store: &S, email: &str) -> UserDBResponse {
    store
        .create_user(&UserCreateDBRequest {
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            name: Some("Test User".to_string()),
        })
        .await
        .unwrap()
}

fn sample_invoice(amount: i64) -> InvoiceDraft {
    InvoiceDraft {
        amount,
        currency: "usd".to_string(),
        status: "paid".to_string(),
        payment_intent_id: "pi_mock_test".to_string(),
    }
}

fn subscription_request(user_id: i64, plan_id: i64) -> SubscriptionCreateDBRequest {
    SubscriptionCreateDBRequest {
        user_id,
        plan_id,
        start_date: Utc::now(),
        end_date: None,
    }
}

#[fixture]
fn in_memory_store() -> InMemoryStore {
    InMemoryStore::new()
}

async fn run_test_plan_catalog_is_seeded<S: Store>(store: &S) {
    let plans = store.list_plans().await.unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].name, "free");
    assert_eq!(plans[0].price_monthly, 0);
    assert_eq!(plans[0].projects_quota, 3);
    assert_eq!(plans[1].name, "pro");
    assert_eq!(plans[1].price_monthly, 999);
    assert_eq!(plans[1].projects_quota, 10);

    let pro = store.get_plan_by_name("pro").await.unwrap().unwrap();
    assert_eq!(store.get_plan(pro.id).await.unwrap(), Some(pro));
    assert!(store.get_plan_by_name("Pro").await.unwrap().is_none());
}

#[rstest]
#[tokio::test]
async fn test_plan_catalog_is_seeded(in_memory_store: InMemoryStore) {
    run_test_plan_catalog_is_seeded(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_plan_catalog_is_seeded_postgres(pool: sqlx::PgPool) {
    run_test_plan_catalog_is_seeded(&PostgresStore::new(pool)).await;
}

async fn run_test_duplicate_email_rejected<S: Store>(store: &S) {
    let user = create_user(store, "dup@example.com").await;
    assert_eq!(store.get_user_by_email("dup@example.com").await.unwrap().map(|u| u.id), Some(user.id));

    let err = store
        .create_user(&UserCreateDBRequest {
            email: "dup@example.com".to_string(),
            password_hash: "x".to_string(),
            name: Some("Other".to_string()),
        })
        .await
        .unwrap_err();
    assert!(err.is_email_conflict(), "unexpected error: {err:?}");
}

#[rstest]
#[tokio::test]
async fn test_duplicate_email_rejected(in_memory_store: InMemoryStore) {
    run_test_duplicate_email_rejected(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_duplicate_email_rejected_postgres(pool: sqlx::PgPool) {
    run_test_duplicate_email_rejected(&PostgresStore::new(pool)).await;
}

async fn run_test_subscription_written_with_invoice<S: Store>(store: &S) {
    let user = create_user(store, "sub@example.com").await;
    let pro = store.get_plan_by_name("pro").await.unwrap().unwrap();

    let (subscription, invoice) = store
        .create_subscription_with_invoice(&subscription_request(user.id, pro.id), &sample_invoice(pro.price_monthly))
        .await
        .unwrap();

    assert_eq!(subscription.status, SubscriptionStatus::Active);
    assert_eq!(subscription.plan_id, pro.id);
    assert_eq!(invoice.subscription_id, subscription.id);
    assert_eq!(invoice.amount, 999);

    let invoices = store.list_invoices(subscription.id).await.unwrap();
    assert_eq!(invoices, vec![invoice]);

    let active = store.get_active_subscription(user.id).await.unwrap();
    assert_eq!(active.map(|s| s.id), Some(subscription.id));
}

#[rstest]
#[tokio::test]
async fn test_subscription_written_with_invoice(in_memory_store: InMemoryStore) {
    run_test_subscription_written_with_invoice(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_subscription_written_with_invoice_postgres(pool: sqlx::PgPool) {
    run_test_subscription_written_with_invoice(&PostgresStore::new(pool)).await;
}

async fn run_test_second_active_subscription_rejected<S: Store>(store: &S) {
    let user = create_user(store, "twice@example.com").await;
    let pro = store.get_plan_by_name("pro").await.unwrap().unwrap();

    store
        .create_subscription_with_invoice(&subscription_request(user.id, pro.id), &sample_invoice(999))
        .await
        .unwrap();

    let err = store
        .create_subscription_with_invoice(&subscription_request(user.id, pro.id), &sample_invoice(999))
        .await
        .unwrap_err();
    assert!(err.is_active_subscription_conflict(), "unexpected error: {err:?}");
}

#[rstest]
#[tokio::test]
async fn test_second_active_subscription_rejected(in_memory_store: InMemoryStore) {
    run_test_second_active_subscription_rejected(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_second_active_subscription_rejected_postgres(pool: sqlx::PgPool) {
    run_test_second_active_subscription_rejected(&PostgresStore::new(pool)).await;
}

async fn run_test_concurrent_subscriptions_only_one_wins<S: Store>(store: &S) {
    let user = create_user(store, "race@example.com").await;
    let pro = store.get_plan_by_name("pro").await.unwrap().unwrap();
    let request = subscription_request(user.id, pro.id);
    let invoice = sample_invoice(999);

    let (first, second) = tokio::join!(
        store.create_subscription_with_invoice(&request, &invoice),
        store.create_subscription_with_invoice(&request, &invoice),
    );

    let successes = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1);
    let failure = first.err().or(second.err()).unwrap();
    assert!(failure.is_active_subscription_conflict(), "unexpected error: {failure:?}");
}

#[rstest]
#[tokio::test]
async fn test_concurrent_subscriptions_only_one_wins(in_memory_store: InMemoryStore) {
    run_test_concurrent_subscriptions_only_one_wins(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_concurrent_subscriptions_only_one_wins_postgres(pool: sqlx::PgPool) {
    run_test_concurrent_subscriptions_only_one_wins(&PostgresStore::new(pool)).await;
}

async fn run_test_cancel_only_applies_to_active<S: Store>(store: &S) {
    let user = create_user(store, "cancel@example.com").await;
    let pro = store.get_plan_by_name("pro").await.unwrap().unwrap();
    let (subscription, _) = store
        .create_subscription_with_invoice(&subscription_request(user.id, pro.id), &sample_invoice(999))
        .await
        .unwrap();

    let ended_at = Utc::now();
    let cancelled = store.cancel_subscription(subscription.id, ended_at).await.unwrap().unwrap();
    assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);
    assert!(cancelled.end_date.is_some());

    assert!(store.cancel_subscription(subscription.id, Utc::now()).await.unwrap().is_none());
    assert!(store.get_active_subscription(user.id).await.unwrap().is_none());

    // A cancelled subscription frees the slot for a new one
    store
        .create_subscription_with_invoice(&subscription_request(user.id, pro.id), &sample_invoice(999))
        .await
        .unwrap();
}

#[rstest]
#[tokio::test]
async fn test_cancel_only_applies_to_active(in_memory_store: InMemoryStore) {
    run_test_cancel_only_applies_to_active(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_cancel_only_applies_to_active_postgres(pool: sqlx::PgPool) {
    run_test_cancel_only_applies_to_active(&PostgresStore::new(pool)).await;
}

async fn run_test_expire_due_subscriptions<S: Store>(store: &S) {
    let due_user = create_user(store, "due@example.com").await;
    let open_user = create_user(store, "open@example.com").await;
    let later_user = create_user(store, "later@example.com").await;
    let pro = store.get_plan_by_name("pro").await.unwrap().unwrap();
    let now = Utc::now();

    let (due, _) = store
        .create_subscription_with_invoice(
            &SubscriptionCreateDBRequest {
                end_date: Some(now - Duration::minutes(1)),
                ..subscription_request(due_user.id, pro.id)
            },
            &sample_invoice(999),
        )
        .await
        .unwrap();
    store
        .create_subscription_with_invoice(&subscription_request(open_user.id, pro.id), &sample_invoice(999))
        .await
        .unwrap();
    store
        .create_subscription_with_invoice(
            &SubscriptionCreateDBRequest {
                end_date: Some(now + Duration::days(30)),
                ..subscription_request(later_user.id, pro.id)
            },
            &sample_invoice(999),
        )
        .await
        .unwrap();

    assert_eq!(store.expire_subscriptions(now).await.unwrap(), 1);
    assert_eq!(store.expire_subscriptions(now).await.unwrap(), 0);

    let expired = store.get_subscription(due.id).await.unwrap().unwrap();
    assert_eq!(expired.status, SubscriptionStatus::Expired);
    assert!(store.get_active_subscription(due_user.id).await.unwrap().is_none());
    assert!(store.get_active_subscription(open_user.id).await.unwrap().is_some());
    assert!(store.get_active_subscription(later_user.id).await.unwrap().is_some());
}

#[rstest]
#[tokio::test]
async fn test_expire_due_subscriptions(in_memory_store: InMemoryStore) {
    run_test_expire_due_subscriptions(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_expire_due_subscriptions_postgres(pool: sqlx::PgPool) {
    run_test_expire_due_subscriptions(&PostgresStore::new(pool)).await;
}

async fn run_test_projects_scoped_to_owner<S: Store>(store: &S) {
    let alice = create_user(store, "alice@example.com").await;
    let bob = create_user(store, "bob@example.com").await;

    for name in ["one", "two"] {
        store
            .create_project(&ProjectCreateDBRequest {
                owner_id: alice.id,
                name: name.to_string(),
                description: None,
            })
            .await
            .unwrap();
    }
    let bobs = store
        .create_project(&ProjectCreateDBRequest {
            owner_id: bob.id,
            name: "bob's".to_string(),
            description: Some("mine".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(store.count_projects(alice.id).await.unwrap(), 2);
    assert_eq!(store.count_projects(bob.id).await.unwrap(), 1);

    let listed = store.list_projects(alice.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "two");
    assert!(listed.iter().all(|p| p.owner_id == alice.id));

    assert!(store.delete_project(bobs.id).await.unwrap());
    assert!(!store.delete_project(bobs.id).await.unwrap());
    assert!(store.get_project(bobs.id).await.unwrap().is_none());
}

#[rstest]
#[tokio::test]
async fn test_projects_scoped_to_owner(in_memory_store: InMemoryStore) {
    run_test_projects_scoped_to_owner(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_projects_scoped_to_owner_postgres(pool: sqlx::PgPool) {
    run_test_projects_scoped_to_owner(&PostgresStore::new(pool)).await;
}

async fn run_test_project_requires_existing_owner<S: Store>(store: &S) {
    let err = store
        .create_project(&ProjectCreateDBRequest {
            owner_id: 424242,
            name: "orphan".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "unexpected error: {err:?}");
}

#[rstest]
#[tokio::test]
async fn test_project_requires_existing_owner(in_memory_store: InMemoryStore) {
    run_test_project_requires_existing_owner(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_project_requires_existing_owner_postgres(pool: sqlx::PgPool) {
    run_test_project_requires_existing_owner(&PostgresStore::new(pool)).await;
}

async fn run_test_task_paging_and_update<S: Store>(store: &S) {
    let user = create_user(store, "tasks@example.com").await;

    for i in 0..5 {
        store
            .create_task(&TaskCreateDBRequest {
                owner_id: user.id,
                title: format!("task {i}"),
                description: None,
                done: false,
            })
            .await
            .unwrap();
    }

    let first_page = store.list_tasks(user.id, 0, 2).await.unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].title, "task 4");

    let last_page = store.list_tasks(user.id, 4, 2).await.unwrap();
    assert_eq!(last_page.len(), 1);
    assert_eq!(last_page[0].title, "task 0");

    let target = &first_page[1];
    let updated = store
        .update_task(
            target.id,
            &TaskUpdateDBRequest {
                done: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(updated.done);
    assert_eq!(updated.title, target.title);

    assert!(store.update_task(999_999, &TaskUpdateDBRequest::default()).await.unwrap().is_none());
    assert!(store.delete_task(target.id).await.unwrap());
    assert!(store.get_task(target.id).await.unwrap().is_none());
}

#[rstest]
#[tokio::test]
async fn test_task_paging_and_update(in_memory_store: InMemoryStore) {
    run_test_task_paging_and_update(&in_memory_store).await;
}

#[cfg(feature = "postgres-tests")]
#[sqlx::test]
async fn test_task_paging_and_update_postgres(pool: sqlx::PgPool) {
    run_test_task_paging_and_update(&PostgresStore::new(pool)).await;
}
