//! OpenAPI documentation for the `/api` surface.
//!
//! The document is served as JSON at `/api-docs/openapi.json` and rendered with Scalar at
//! `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{api, db::models::subscriptions::SubscriptionStatus, errors::ErrorBody};

/// Bearer JWT issued by register/login.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token from `POST /auth/register` or `POST /auth/login`:\n\n\
                            ```\nAuthorization: Bearer YOUR_ACCESS_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api", description = "Planboard API")
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::plans::list_plans,
        api::handlers::subscriptions::create_subscription,
        api::handlers::subscriptions::get_current_subscription,
        api::handlers::subscriptions::cancel_current_subscription,
        api::handlers::subscriptions::cancel_subscription,
        api::handlers::projects::list_projects,
        api::handlers::projects::create_project,
        api::handlers::projects::delete_project,
        api::handlers::tasks::create_task,
        api::handlers::tasks::list_tasks,
        api::handlers::tasks::get_task,
        api::handlers::tasks::update_task,
        api::handlers::tasks::delete_task,
    ),
    components(
        schemas(
            ErrorBody,
            SubscriptionStatus,
            api::models::auth::RegisterRequest,
            api::models::auth::LoginRequest,
            api::models::auth::AuthResponse,
            api::models::users::UserResponse,
            api::models::plans::PlanResponse,
            api::models::plans::PlanSummary,
            api::models::subscriptions::CreateSubscriptionRequest,
            api::models::subscriptions::SubscriptionResponse,
            api::models::subscriptions::CreateSubscriptionResponse,
            api::models::projects::ProjectCreate,
            api::models::projects::ProjectResponse,
            api::models::tasks::TaskCreate,
            api::models::tasks::TaskUpdate,
            api::models::tasks::TaskResponse,
        )
    ),
    tags(
        (name = "authentication", description = "Registration and login"),
        (name = "plans", description = "Plan catalog"),
        (name = "subscriptions", description = "Plan purchase and cancellation"),
        (name = "projects", description = "Projects, limited by the caller's plan"),
        (name = "tasks", description = "Personal tasks"),
    ),
    info(
        title = "Planboard API",
        description = "Subscription-gated project management. Every error body is `{ \"error\": \"...\" }`, localized from `Accept-Language` (English or Spanish).",
    )
)]
pub struct ApiDoc;
