use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::{
        handlers::{JsonBody, parse_id},
        models::subscriptions::{CreateSubscriptionRequest, CreateSubscriptionResponse, SubscriptionResponse},
    },
    auth::current_user::CurrentUser,
    errors::Error,
    i18n::{Lang, Message},
    services::{ServiceError, subscriptions},
    types::Resource,
};

/// Purchase a plan
#[utoipa::path(
    post,
    path = "/subscriptions",
    request_body = CreateSubscriptionRequest,
    tag = "subscriptions",
    summary = "Subscribe to a plan",
    description = "Confirm payment for the plan and start an active subscription. Fails if one is already active.",
    responses(
        (status = 201, description = "Subscription created", body = CreateSubscriptionResponse),
        (status = 400, description = "Already subscribed or unknown plan", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 402, description = "Payment not completed", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
    lang: Lang,
    JsonBody(request): JsonBody<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<CreateSubscriptionResponse>), Error> {
    let purchase = subscriptions::create_subscription(
        state.store.as_ref(),
        state.payments.as_ref(),
        user.id,
        request.plan_id,
        state.config.subscriptions.term,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSubscriptionResponse {
            message: Message::SubscriptionCreated.render(lang),
            subscription: purchase.subscription.into(),
        }),
    ))
}

/// Get the caller's active subscription
#[utoipa::path(
    get,
    path = "/subscriptions/current",
    tag = "subscriptions",
    summary = "Current subscription",
    responses(
        (status = 200, description = "Active subscription", body = SubscriptionResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "No active subscription", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_current_subscription(State(state): State<AppState>, user: CurrentUser) -> Result<Json<SubscriptionResponse>, Error> {
    let current = subscriptions::get_current_subscription(state.store.as_ref(), user.id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Resource::Subscription, "current"))?;

    Ok(Json(current.into()))
}

/// Cancel the caller's active subscription
#[utoipa::path(
    delete,
    path = "/subscriptions/current",
    tag = "subscriptions",
    summary = "Cancel current subscription",
    description = "Existing projects are kept; the project quota falls back to the free tier.",
    responses(
        (status = 204, description = "Subscription cancelled"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 404, description = "No active subscription", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn cancel_current_subscription(State(state): State<AppState>, user: CurrentUser) -> Result<StatusCode, Error> {
    subscriptions::cancel_current_subscription(state.store.as_ref(), user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Cancel a subscription by id
#[utoipa::path(
    delete,
    path = "/subscriptions/{id}",
    tag = "subscriptions",
    summary = "Cancel subscription",
    params(
        ("id" = i64, Path, description = "Subscription ID"),
    ),
    responses(
        (status = 204, description = "Subscription cancelled"),
        (status = 400, description = "Invalid subscription ID", body = crate::errors::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorBody),
        (status = 403, description = "Subscription belongs to another user", body = crate::errors::ErrorBody),
        (status = 404, description = "Subscription not found or no longer active", body = crate::errors::ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn cancel_subscription(State(state): State<AppState>, user: CurrentUser, Path(id): Path<String>) -> Result<StatusCode, Error> {
    let subscription_id = parse_id(&id, Resource::Subscription)?;
    subscriptions::cancel_subscription(state.store.as_ref(), user.id, subscription_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{bearer, create_test_server, signup};
    use axum::http::{StatusCode, header::AUTHORIZATION};
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_purchase_pro_then_current() {
        let (server, state) = create_test_server();
        let token = signup(&server, "buyer@example.com").await;

        let response = server
            .post("/api/subscriptions")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "planId": 2 }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["message"], "Subscription created successfully");
        assert_eq!(body["subscription"]["planId"], 2);
        assert_eq!(body["subscription"]["status"], "active");

        let current: Value = server
            .get("/api/subscriptions/current")
            .add_header(AUTHORIZATION, bearer(&token))
            .await
            .json();
        assert_eq!(current["status"], "active");
        assert_eq!(current["plan"]["name"], "pro");
        assert_eq!(current["plan"]["projectsQuota"], 10);
        assert!(current["endDate"].is_null());

        let subscription_id = current["id"].as_i64().unwrap();
        let invoices = state.store.list_invoices(subscription_id).await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].amount, 999);
        assert_eq!(invoices[0].status, "paid");
    }

    #[tokio::test]
    async fn test_second_purchase_is_rejected() {
        let (server, _) = create_test_server();
        let token = signup(&server, "twice@example.com").await;

        for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
            server
                .post("/api/subscriptions")
                .add_header(AUTHORIZATION, bearer(&token))
                .json(&json!({ "planId": 1 }))
                .await
                .assert_status(expected);
        }

        let response = server
            .post("/api/subscriptions")
            .add_header(AUTHORIZATION, bearer(&token))
            .add_header("accept-language", "es")
            .json(&json!({ "planId": 2 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Ya tienes una suscripción activa" }));
    }

    #[tokio::test]
    async fn test_unknown_plan() {
        let (server, _) = create_test_server();
        let token = signup(&server, "unknown@example.com").await;

        let response = server
            .post("/api/subscriptions")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "planId": 999 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Invalid plan" }));

        let response = server
            .post("/api/subscriptions")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "planId": "pro" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid request body: "), "unexpected error: {error}");
        assert!(error.contains("planId"), "unexpected error: {error}");
    }

    #[tokio::test]
    async fn test_cancel_current_twice() {
        let (server, _) = create_test_server();
        let token = signup(&server, "cancel@example.com").await;

        server
            .get("/api/subscriptions/current")
            .add_header(AUTHORIZATION, bearer(&token))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .post("/api/subscriptions")
            .add_header(AUTHORIZATION, bearer(&token))
            .json(&json!({ "planId": 2 }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .delete("/api/subscriptions/current")
            .add_header(AUTHORIZATION, bearer(&token))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let response = server
            .delete("/api/subscriptions/current")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "error": "Subscription not found" }));
    }

    #[tokio::test]
    async fn test_cancel_by_id_checks_owner() {
        let (server, _) = create_test_server();
        let owner = signup(&server, "owner@example.com").await;
        let other = signup(&server, "other@example.com").await;

        let body: Value = server
            .post("/api/subscriptions")
            .add_header(AUTHORIZATION, bearer(&owner))
            .json(&json!({ "planId": 2 }))
            .await
            .json();
        let id = body["subscription"]["id"].as_i64().unwrap();

        server
            .delete(&format!("/api/subscriptions/{id}"))
            .add_header(AUTHORIZATION, bearer(&other))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        server
            .delete("/api/subscriptions/abc")
            .add_header(AUTHORIZATION, bearer(&owner))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .delete(&format!("/api/subscriptions/{id}"))
            .add_header(AUTHORIZATION, bearer(&owner))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        // Already cancelled
        server
            .delete(&format!("/api/subscriptions/{id}"))
            .add_header(AUTHORIZATION, bearer(&owner))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let (server, _) = create_test_server();

        let response = server.get("/api/subscriptions/current").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "error": "Unauthorized" }));

        let response = server
            .post("/api/subscriptions")
            .add_header(AUTHORIZATION, "Bearer garbage")
            .json(&json!({ "planId": 2 }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "error": "Invalid token" }));
    }
}
