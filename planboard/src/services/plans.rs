//! Plan catalog lookups.

use tracing::instrument;

use crate::{
    db::{models::plans::PlanDBResponse, store::Store},
    services::Result,
    types::PlanId,
};

/// All plans, cheapest first
#[instrument(skip(store), err)]
pub async fn list_plans(store: &dyn Store) -> Result<Vec<PlanDBResponse>> {
    Ok(store.list_plans().await?)
}

#[instrument(skip(store), err)]
pub async fn get_plan_by_id(store: &dyn Store, id: PlanId) -> Result<Option<PlanDBResponse>> {
    Ok(store.get_plan(id).await?)
}

/// Case-sensitive lookup by plan name (`free`, `pro`)
#[instrument(skip(store), err)]
pub async fn get_plan_by_name(store: &dyn Store, name: &str) -> Result<Option<PlanDBResponse>> {
    Ok(store.get_plan_by_name(name).await?)
}
