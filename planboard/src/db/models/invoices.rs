//! Database models for invoices.

use crate::types::{InvoiceId, SubscriptionId};
use chrono::{DateTime, Utc};

/// Invoice fields known before the owning subscription exists.
///
/// The store attaches the subscription id when it writes both rows in one unit of work.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub payment_intent_id: String,
}

/// Database response for an invoice
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct InvoiceDBResponse {
    pub id: InvoiceId,
    pub subscription_id: SubscriptionId,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub payment_intent_id: String,
    pub created_at: DateTime<Utc>,
}
