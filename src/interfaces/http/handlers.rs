use super::AppState;
use crate::domain::order_email::OrderEmailRequest;
use crate::domain::payment::{PaymentIntent, PaymentNotification};
use crate::error::{CheckoutError, Result};
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde_json::{Value, json};

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// `POST /create-gopay-payment`
pub async fn create_payment(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let intent: PaymentIntent = serde_json::from_slice(&body)?;
    let payment = state.checkout.create_payment(intent).await?;
    Ok(Json(payment))
}

/// `POST /gopay-webhook` with `{"id": ...}`.
///
/// Notifications are not signed. The id is only used to look the payment up
/// on the gateway, whose answer is what gets stored. An empty body is treated
/// like a body without an id.
pub async fn payment_webhook(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let notification: PaymentNotification = if body.iter().all(u8::is_ascii_whitespace) {
        PaymentNotification::default()
    } else {
        serde_json::from_slice(&body)?
    };
    reconcile(&state, notification).await
}

/// `GET /gopay-webhook?id=...`, the form GoPay itself uses for notifications.
pub async fn payment_notification(
    State(state): State<AppState>,
    query: std::result::Result<Query<PaymentNotification>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(notification) =
        query.map_err(|rejection| CheckoutError::BadRequest(rejection.body_text()))?;
    reconcile(&state, notification).await
}

async fn reconcile(state: &AppState, notification: PaymentNotification) -> Result<Json<Value>> {
    // Missing ids are rejected before any upstream call is made.
    let payment_id = notification.payment_id()?;
    let gateway_state = state.reconciler.reconcile(payment_id).await?;
    Ok(Json(json!({ "success": true, "status": gateway_state.as_str() })))
}

/// `POST /send-order-email`
pub async fn send_order_email(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let request: OrderEmailRequest = serde_json::from_slice(&body)?;
    let receipt = state.mailer.send_confirmation(request).await?;
    Ok(Json(json!({ "success": true, "emailId": receipt.id })))
}
