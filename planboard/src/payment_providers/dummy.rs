//! Dummy payment provider implementation
//!
//! This provider confirms every payment instantly without contacting a gateway.
//! Useful for development and tests, and the only provider shipped today.

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    config::DummyConfig,
    payment_providers::{PaymentError, PaymentIntent, PaymentIntentStatus, PaymentProvider, PaymentRequest, Result},
};

/// Dummy payment provider that reports every charge as succeeded
pub struct DummyProvider {
    currency: String,
}

impl From<DummyConfig> for DummyProvider {
    fn from(config: DummyConfig) -> Self {
        Self::new(config.currency)
    }
}

impl DummyProvider {
    /// Create a new Dummy provider charging in `currency`
    pub fn new(currency: impl Into<String>) -> Self {
        Self { currency: currency.into() }
    }
}

#[async_trait]
impl PaymentProvider for DummyProvider {
    async fn confirm_payment(&self, request: &PaymentRequest) -> Result<PaymentIntent> {
        if request.amount < 0 {
            return Err(PaymentError::InvalidData(format!("negative amount {}", request.amount)));
        }

        let intent = PaymentIntent {
            id: format!(
                "pi_mock_{}_{}_{}",
                Utc::now().timestamp_millis(),
                request.user_id,
                request.plan_id
            ),
            status: PaymentIntentStatus::Succeeded,
            amount: request.amount,
            currency: self.currency.clone(),
        };

        tracing::info!(
            payment_intent_id = %intent.id,
            user_id = request.user_id,
            plan_id = request.plan_id,
            "Dummy provider confirmed payment"
        );

        Ok(intent)
    }
}
