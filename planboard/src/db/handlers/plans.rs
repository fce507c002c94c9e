//! Database repository for the plan catalog.

use crate::{
    db::{errors::Result, models::plans::PlanDBResponse},
    types::PlanId,
};
use sqlx::PgConnection;
use tracing::instrument;

const PLAN_COLUMNS: &str = "id, name, display_name, description, price_monthly, projects_quota, created_at";

pub struct Plans<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Plans<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// All plans, cheapest first
    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<PlanDBResponse>> {
        let plans = sqlx::query_as::<_, PlanDBResponse>(&format!("SELECT {PLAN_COLUMNS} FROM plans ORDER BY price_monthly ASC, id ASC"))
            .fetch_all(&mut *self.db)
            .await?;

        Ok(plans)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: PlanId) -> Result<Option<PlanDBResponse>> {
        let plan = sqlx::query_as::<_, PlanDBResponse>(&format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(plan)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_name(&mut self, name: &str) -> Result<Option<PlanDBResponse>> {
        let plan = sqlx::query_as::<_, PlanDBResponse>(&format!("SELECT {PLAN_COLUMNS} FROM plans WHERE name = $1"))
            .bind(name)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(plan)
    }
}

#[cfg(all(test, feature = "postgres-tests"))]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_seeded_plans(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Plans::new(&mut conn);

        let plans = repo.list().await.unwrap();
        let names: Vec<_> = plans.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["free", "pro"]);

        let pro = repo.get_by_name("pro").await.unwrap().unwrap();
        assert_eq!(pro.price_monthly, 999);
        assert_eq!(pro.projects_quota, 10);
        assert_eq!(repo.get_by_id(pro.id).await.unwrap(), Some(pro));

        // Exact-case lookup only
        assert!(repo.get_by_name("Pro").await.unwrap().is_none());
    }
}
