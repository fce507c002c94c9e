//! Plan catalog responses.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    db::models::plans::PlanDBResponse,
    i18n::{Lang, plan_text},
    types::PlanId,
};

/// A plan, with display text in the caller's language
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub id: PlanId,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    /// Monthly price in cents
    pub price_monthly: i64,
    pub projects_quota: i64,
    pub features: Vec<String>,
}

impl PlanResponse {
    /// Localize a stored plan. Plans without catalog text keep their stored values.
    pub fn localized(plan: PlanDBResponse, lang: Lang) -> Self {
        let text = plan_text(&plan.name, lang);
        Self {
            id: plan.id,
            display_name: text.as_ref().map_or(plan.display_name, |t| t.display_name.to_string()),
            description: match &text {
                Some(t) => Some(t.description.to_string()),
                None => plan.description,
            },
            price_monthly: plan.price_monthly,
            projects_quota: plan.projects_quota,
            features: text.map(|t| t.features.iter().map(|f| f.to_string()).collect()).unwrap_or_default(),
            name: plan.name,
        }
    }
}

/// Plan summary embedded in subscription responses
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: PlanId,
    pub name: String,
    pub display_name: String,
    pub price_monthly: i64,
    pub projects_quota: i64,
}

impl From<PlanDBResponse> for PlanSummary {
    fn from(plan: PlanDBResponse) -> Self {
        Self {
            id: plan.id,
            name: plan.name,
            display_name: plan.display_name,
            price_monthly: plan.price_monthly,
            projects_quota: plan.projects_quota,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn plan(name: &str) -> PlanDBResponse {
        PlanDBResponse {
            id: 9,
            name: name.to_string(),
            display_name: "Stored".to_string(),
            description: Some("stored description".to_string()),
            price_monthly: 500,
            projects_quota: 5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_catalog_plan_is_localized() {
        let response = PlanResponse::localized(plan("free"), Lang::Es);
        assert_eq!(response.display_name, "Plan Gratuito");
        assert_eq!(response.features.len(), 3);
        assert_eq!(response.price_monthly, 500);
    }

    #[test]
    fn test_unknown_plan_keeps_stored_text() {
        let response = PlanResponse::localized(plan("team"), Lang::Es);
        assert_eq!(response.display_name, "Stored");
        assert_eq!(response.description.as_deref(), Some("stored description"));
        assert!(response.features.is_empty());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(PlanResponse::localized(plan("pro"), Lang::En)).unwrap();
        assert_eq!(json["displayName"], "Pro Plan");
        assert_eq!(json["projectsQuota"], 5);
        assert!(json.get("price_monthly").is_none());
    }
}
