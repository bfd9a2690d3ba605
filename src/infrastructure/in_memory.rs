use crate::domain::order::OrderRecord;
use crate::domain::payment::{OrderStatusUpdate, PaymentId};
use crate::domain::ports::{OrderStore, UpdateOutcome};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory order table.
///
/// Used for local development when no Supabase project is configured, and
/// in tests. Rows are kept in insertion order; nothing enforces uniqueness of
/// payment ids on insert, so the update path has to.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<OrderRecord>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order: OrderRecord) {
        self.orders.write().await.push(order);
    }

    pub async fn find_by_payment(&self, payment_id: &PaymentId) -> Vec<OrderRecord> {
        let orders = self.orders.read().await;
        orders
            .iter()
            .filter(|order| order.references(payment_id))
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<OrderRecord> {
        self.orders.read().await.clone()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn apply_status(&self, update: &OrderStatusUpdate) -> Result<UpdateOutcome> {
        let mut orders = self.orders.write().await;
        let mut matching = orders
            .iter_mut()
            .filter(|order| order.references(&update.payment_id));

        let Some(order) = matching.next() else {
            return Ok(UpdateOutcome::NoMatchingOrder);
        };
        if matching.next().is_some() {
            return Err(CheckoutError::AmbiguousOrder(update.payment_id.to_string()));
        }

        order.apply(update);
        Ok(UpdateOutcome::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{GatewayState, OrderStatus, PaymentStatus};
    use chrono::Utc;

    fn payment_id(raw: &str) -> PaymentId {
        PaymentId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_apply_status_updates_matching_order() {
        let store = InMemoryOrderStore::new();
        store.insert(OrderRecord::new("1", Some(payment_id("100")))).await;
        store.insert(OrderRecord::new("2", Some(payment_id("200")))).await;

        let update =
            OrderStatusUpdate::from_state(payment_id("100"), GatewayState::Paid, Utc::now());
        let outcome = store.apply_status(&update).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);

        let updated = store.find_by_payment(&payment_id("100")).await;
        assert_eq!(updated[0].payment_status, PaymentStatus::Paid);
        assert_eq!(updated[0].status, OrderStatus::Active);

        let untouched = store.find_by_payment(&payment_id("200")).await;
        assert_eq!(untouched[0].payment_status, PaymentStatus::Unpaid);
    }

    #[tokio::test]
    async fn test_apply_status_without_match() {
        let store = InMemoryOrderStore::new();
        store.insert(OrderRecord::new("1", None)).await;

        let update =
            OrderStatusUpdate::from_state(payment_id("100"), GatewayState::Paid, Utc::now());
        assert_eq!(
            store.apply_status(&update).await.unwrap(),
            UpdateOutcome::NoMatchingOrder
        );
        assert_eq!(store.all().await[0].gopay_status, None);
    }

    #[tokio::test]
    async fn test_duplicate_payment_ids_are_rejected_untouched() {
        let store = InMemoryOrderStore::new();
        store.insert(OrderRecord::new("1", Some(payment_id("100")))).await;
        store.insert(OrderRecord::new("2", Some(payment_id("100")))).await;

        let update =
            OrderStatusUpdate::from_state(payment_id("100"), GatewayState::Paid, Utc::now());
        let result = store.apply_status(&update).await;
        assert!(matches!(result, Err(CheckoutError::AmbiguousOrder(id)) if id == "100"));

        for order in store.all().await {
            assert_eq!(order.payment_status, PaymentStatus::Unpaid);
            assert_eq!(order.paid_at, None);
        }
    }
}
