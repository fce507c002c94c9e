//! Subscription lifecycle.
//!
//! A user holds at most one active subscription. Purchasing goes through the payment
//! provider first; only a confirmed payment produces the subscription row and its invoice,
//! which the store writes together. The store also backstops the one-active rule for
//! concurrent purchases, and that conflict is reported as [`ServiceError::AlreadyActive`].
//!
//! Status transitions are `active -> cancelled` (explicit cancel) and `active -> expired`
//! (see [`crate::services::expiry`]). Nothing leaves `cancelled` or `expired`.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tracing::instrument;

use crate::{
    db::{
        models::{
            invoices::{InvoiceDBResponse, InvoiceDraft},
            plans::PlanDBResponse,
            subscriptions::{SubscriptionCreateDBRequest, SubscriptionDBResponse},
        },
        store::Store,
    },
    payment_providers::{PaymentProvider, PaymentRequest},
    services::{Result, ServiceError},
    types::{PlanId, Resource, SubscriptionId, UserId},
};

/// Invoice status recorded for a confirmed purchase
pub const INVOICE_STATUS_PAID: &str = "paid";

/// A subscription with its plan resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionWithPlan {
    pub subscription: SubscriptionDBResponse,
    pub plan: PlanDBResponse,
}

/// Result of a successful purchase
#[derive(Debug, Clone)]
pub struct Purchase {
    pub subscription: SubscriptionWithPlan,
    pub invoice: InvoiceDBResponse,
}

async fn attach_plan(store: &dyn Store, subscription: SubscriptionDBResponse) -> Result<SubscriptionWithPlan> {
    let plan = store
        .get_plan(subscription.plan_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Resource::Plan, subscription.plan_id))?;
    Ok(SubscriptionWithPlan { subscription, plan })
}

/// The user's active subscription, if any.
///
/// `None` means the user is on the free tier; callers decide what that implies.
#[instrument(skip(store), err)]
pub async fn get_current_subscription(store: &dyn Store, user_id: UserId) -> Result<Option<SubscriptionWithPlan>> {
    match store.get_active_subscription(user_id).await? {
        Some(subscription) => Ok(Some(attach_plan(store, subscription).await?)),
        None => Ok(None),
    }
}

/// Purchase `plan_id` for `user_id`.
///
/// With a `term`, the subscription ends `term` after it starts. Terms too large to
/// represent as a timestamp are treated as open-ended.
#[instrument(skip(store, payments), err)]
pub async fn create_subscription(
    store: &dyn Store,
    payments: &dyn PaymentProvider,
    user_id: UserId,
    plan_id: PlanId,
    term: Option<Duration>,
) -> Result<Purchase> {
    if store.get_active_subscription(user_id).await?.is_some() {
        return Err(ServiceError::AlreadyActive);
    }

    let plan = store.get_plan(plan_id).await?.ok_or(ServiceError::InvalidPlan { plan_id })?;

    let intent = payments
        .confirm_payment(&PaymentRequest {
            user_id,
            plan_id,
            amount: plan.price_monthly,
        })
        .await?
        .into_succeeded()?;

    let start_date = Utc::now();
    let end_date = term
        .and_then(|term| TimeDelta::from_std(term).ok())
        .and_then(|term| start_date.checked_add_signed(term));

    let request = SubscriptionCreateDBRequest {
        user_id,
        plan_id,
        start_date,
        end_date,
    };
    let draft = InvoiceDraft {
        amount: plan.price_monthly,
        currency: intent.currency,
        status: INVOICE_STATUS_PAID.to_string(),
        payment_intent_id: intent.id,
    };

    let (subscription, invoice) = store
        .create_subscription_with_invoice(&request, &draft)
        .await
        .map_err(|e| {
            if e.is_active_subscription_conflict() {
                ServiceError::AlreadyActive
            } else {
                ServiceError::Store(e)
            }
        })?;

    tracing::info!(
        subscription_id = subscription.id,
        invoice_id = invoice.id,
        plan = %plan.name,
        "Subscription created"
    );

    Ok(Purchase {
        subscription: SubscriptionWithPlan { subscription, plan },
        invoice,
    })
}

/// Cancel a specific subscription owned by `user_id`.
///
/// Subscriptions that are already cancelled or expired are reported as not found.
#[instrument(skip(store), err)]
pub async fn cancel_subscription(store: &dyn Store, user_id: UserId, subscription_id: SubscriptionId) -> Result<SubscriptionDBResponse> {
    let subscription = store
        .get_subscription(subscription_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Resource::Subscription, subscription_id))?;

    if subscription.user_id != user_id {
        return Err(ServiceError::forbidden(Resource::Subscription, subscription_id));
    }

    let cancelled = store
        .cancel_subscription(subscription_id, Utc::now())
        .await?
        .ok_or_else(|| ServiceError::not_found(Resource::Subscription, subscription_id))?;

    tracing::info!(subscription_id, "Subscription cancelled");
    Ok(cancelled)
}

/// Cancel whatever subscription is currently active for `user_id`.
#[instrument(skip(store), err)]
pub async fn cancel_current_subscription(store: &dyn Store, user_id: UserId) -> Result<SubscriptionDBResponse> {
    let current = store
        .get_active_subscription(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(Resource::Subscription, "current"))?;

    cancel_subscription(store, user_id, current.id).await
}
