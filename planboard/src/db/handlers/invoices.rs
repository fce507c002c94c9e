//! Database repository for invoices.

use crate::{
    db::{
        errors::Result,
        models::invoices::{InvoiceDBResponse, InvoiceDraft},
    },
    types::SubscriptionId,
};
use sqlx::PgConnection;
use tracing::instrument;

const INVOICE_COLUMNS: &str = "id, subscription_id, amount, currency, status, payment_intent_id, created_at";

pub struct Invoices<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Invoices<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, draft), fields(payment_intent_id = %draft.payment_intent_id), err)]
    pub async fn create(&mut self, subscription_id: SubscriptionId, draft: &InvoiceDraft) -> Result<InvoiceDBResponse> {
        let invoice = sqlx::query_as::<_, InvoiceDBResponse>(&format!(
            "INSERT INTO invoices (subscription_id, amount, currency, status, payment_intent_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {INVOICE_COLUMNS}"
        ))
        .bind(subscription_id)
        .bind(draft.amount)
        .bind(&draft.currency)
        .bind(&draft.status)
        .bind(&draft.payment_intent_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(invoice)
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_subscription(&mut self, subscription_id: SubscriptionId) -> Result<Vec<InvoiceDBResponse>> {
        let invoices = sqlx::query_as::<_, InvoiceDBResponse>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE subscription_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(subscription_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(invoices)
    }
}
