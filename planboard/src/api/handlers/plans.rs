use axum::{Json, extract::State};

use crate::{AppState, api::models::plans::PlanResponse, errors::Error, i18n::Lang, services::plans};

/// List all plans
#[utoipa::path(
    get,
    path = "/plans",
    tag = "plans",
    summary = "List plans",
    description = "The plan catalog, cheapest first, localized from `Accept-Language`. No authentication required.",
    responses(
        (status = 200, description = "All plans", body = [PlanResponse]),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_plans(State(state): State<AppState>, lang: Lang) -> Result<Json<Vec<PlanResponse>>, Error> {
    let plans = plans::list_plans(state.store.as_ref()).await?;
    Ok(Json(plans.into_iter().map(|plan| PlanResponse::localized(plan, lang)).collect()))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::create_test_server;
    use serde_json::Value;

    #[tokio::test]
    async fn test_list_plans_is_public_and_ordered() {
        let (server, _) = create_test_server();

        let response = server.get("/api/plans").await;
        response.assert_status_ok();

        let plans: Vec<Value> = response.json();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0]["name"], "free");
        assert_eq!(plans[0]["priceMonthly"], 0);
        assert_eq!(plans[0]["projectsQuota"], 3);
        assert_eq!(plans[1]["name"], "pro");
        assert_eq!(plans[1]["priceMonthly"], 999);
        assert_eq!(plans[1]["projectsQuota"], 10);
        assert_eq!(plans[1]["features"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_list_plans_in_spanish() {
        let (server, _) = create_test_server();

        let plans: Vec<Value> = server.get("/api/plans").add_header("accept-language", "es").await.json();
        assert_eq!(plans[0]["displayName"], "Plan Gratuito");
        assert_eq!(plans[1]["displayName"], "Plan Pro");
    }
}
