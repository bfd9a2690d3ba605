use crate::domain::payment::{GatewayPaymentStatus, GatewayState, OrderStatusUpdate, PaymentId};
use crate::domain::ports::{OrderStoreBox, PaymentGatewayBox, UpdateOutcome};
use crate::error::Result;
use chrono::Utc;

/// Brings an order in line with the gateway's view of its payment.
///
/// The gateway is always asked for the current state; nothing in the
/// notification itself is trusted beyond the payment id. Repeated
/// notifications re-apply the same update and concurrent ones race, the last
/// write wins.
pub struct PaymentReconciler {
    gateway: PaymentGatewayBox,
    orders: OrderStoreBox,
}

impl PaymentReconciler {
    pub fn new(gateway: PaymentGatewayBox, orders: OrderStoreBox) -> Self {
        Self { gateway, orders }
    }

    /// Re-fetches the payment, stores the derived statuses and returns the
    /// raw gateway state.
    pub async fn reconcile(&self, payment_id: PaymentId) -> Result<GatewayState> {
        let token = self.gateway.access_token().await?;
        let GatewayPaymentStatus {
            state,
            order_number,
        } = self.gateway.payment_status(&token, &payment_id).await?;

        let update = OrderStatusUpdate::from_state(payment_id, state, Utc::now());
        tracing::info!(
            payment_id = %update.payment_id,
            order_number = order_number.as_deref().unwrap_or("-"),
            gateway_status = %update.gateway_status,
            payment_status = ?update.payment_status,
            order_status = ?update.order_status,
            "reconciling order"
        );

        match self.orders.apply_status(&update).await? {
            UpdateOutcome::Updated => {}
            UpdateOutcome::NoMatchingOrder => {
                tracing::warn!(payment_id = %update.payment_id, "no order references this payment");
            }
        }

        Ok(update.gateway_status)
    }
}
