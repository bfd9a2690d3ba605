use super::payment::{OrderStatus, OrderStatusUpdate, PaymentId, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The payment-related columns of an order row.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct OrderRecord {
    pub order_id: String,
    pub gopay_payment_id: Option<PaymentId>,
    /// Raw gateway state from the last reconciliation.
    pub gopay_status: Option<String>,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub paid_at: Option<DateTime<Utc>>,
}

impl OrderRecord {
    /// A freshly placed order awaiting payment.
    pub fn new(order_id: impl Into<String>, payment_id: Option<PaymentId>) -> Self {
        Self {
            order_id: order_id.into(),
            gopay_payment_id: payment_id,
            gopay_status: None,
            payment_status: PaymentStatus::Unpaid,
            status: OrderStatus::Pending,
            paid_at: None,
        }
    }

    pub fn references(&self, payment_id: &PaymentId) -> bool {
        self.gopay_payment_id.as_ref() == Some(payment_id)
    }

    pub fn apply(&mut self, update: &OrderStatusUpdate) {
        self.gopay_status = Some(update.gateway_status.as_str().to_string());
        self.payment_status = update.payment_status;
        self.status = update.order_status;
        self.paid_at = update.paid_at;
    }
}
