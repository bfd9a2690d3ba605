use super::order_email::{EmailReceipt, OutgoingEmail};
use super::payment::{
    AccessToken, GatewayPayment, GatewayPaymentStatus, OrderStatusUpdate, PaymentId,
};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Client-credentials token for the configured merchant.
    async fn access_token(&self) -> Result<AccessToken>;
    /// Creates a payment and returns the gateway's response body untouched.
    async fn create_payment(&self, token: &AccessToken, payment: &GatewayPayment) -> Result<Value>;
    async fn payment_status(
        &self,
        token: &AccessToken,
        id: &PaymentId,
    ) -> Result<GatewayPaymentStatus>;
}

/// Result of applying a status update to the order table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NoMatchingOrder,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Applies `update` to the single order referencing its payment id.
    ///
    /// More than one matching order is an error and must leave every row untouched.
    async fn apply_status(&self, update: &OrderStatusUpdate) -> Result<UpdateOutcome>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt>;
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type OrderStoreBox = Box<dyn OrderStore>;
pub type EmailSenderBox = Box<dyn EmailSender>;
