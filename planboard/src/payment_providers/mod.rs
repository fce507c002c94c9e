//! Payment provider abstraction layer
//!
//! This module defines the `PaymentProvider` trait which confirms payment for a plan
//! purchase before the subscription is written. Only a mock provider exists; a real
//! gateway would slot in as another `PaymentConfig` variant.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::Serialize;

use crate::{
    config::PaymentConfig,
    types::{PlanId, UserId},
};

pub mod dummy;

/// Create a payment provider from configuration
///
/// This is the single point where we convert config into provider instances.
pub fn create_provider(config: &PaymentConfig) -> Box<dyn PaymentProvider> {
    match config {
        PaymentConfig::Dummy(dummy_config) => Box::new(dummy::DummyProvider::from(dummy_config.clone())),
    }
}

/// Result type for payment provider operations
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Errors that can occur during payment processing
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment provider API error: {0}")]
    ProviderApi(String),

    #[error("Payment not completed")]
    PaymentNotCompleted,

    #[error("Invalid payment data: {0}")]
    InvalidData(String),
}

impl From<&PaymentError> for StatusCode {
    fn from(err: &PaymentError) -> Self {
        match err {
            PaymentError::PaymentNotCompleted => StatusCode::PAYMENT_REQUIRED,
            PaymentError::InvalidData(_) => StatusCode::BAD_REQUEST,
            PaymentError::ProviderApi(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// What is being paid for
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub user_id: UserId,
    pub plan_id: PlanId,
    /// Amount in minor currency units
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    Succeeded,
    RequiresAction,
    Failed,
}

/// Provider's record of a confirmed (or refused) payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    /// Provider reference, stored on the invoice
    pub id: String,
    pub status: PaymentIntentStatus,
    pub amount: i64,
    pub currency: String,
}

impl PaymentIntent {
    /// Accept only intents the provider reports as settled
    pub fn into_succeeded(self) -> Result<Self> {
        match self.status {
            PaymentIntentStatus::Succeeded => Ok(self),
            PaymentIntentStatus::RequiresAction | PaymentIntentStatus::Failed => Err(PaymentError::PaymentNotCompleted),
        }
    }
}

/// Abstract payment provider interface
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Charge for a plan purchase.
    ///
    /// Returns the provider's intent. Callers must check the status (see
    /// [`PaymentIntent::into_succeeded`]) before treating the purchase as paid.
    async fn confirm_payment(&self, request: &PaymentRequest) -> Result<PaymentIntent>;
}
