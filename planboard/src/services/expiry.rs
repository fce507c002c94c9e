//! Background expiry of fixed-term subscriptions.
//!
//! Only runs when `subscriptions.term` is configured; otherwise subscriptions have no end
//! date and there is nothing to sweep.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{db::store::Store, services::Result};

/// Move every active subscription whose end date has passed to `expired`.
#[instrument(skip(store), err)]
pub async fn expire_due_subscriptions(store: &dyn Store) -> Result<u64> {
    let expired = store.expire_subscriptions(Utc::now()).await?;
    if expired > 0 {
        tracing::info!(expired, "Expired subscriptions past their end date");
    }
    Ok(expired)
}

/// Sweep every `interval` until `shutdown` is cancelled.
pub async fn run_expiry_sweeper(store: Arc<dyn Store>, interval: Duration, shutdown: CancellationToken) {
    tracing::info!("Starting subscription expiry sweeper (every {:?})", interval);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Subscription expiry sweeper stopped");
                return;
            }
            _ = ticker.tick() => {
                if let Err(e) = expire_due_subscriptions(store.as_ref()).await {
                    tracing::error!("Subscription expiry sweep failed: {}", e);
                }
            }
        }
    }
}
