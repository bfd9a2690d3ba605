//! HTTP transport: routes, CORS and error-to-status translation.
//!
//! ## Routes
//!
//! - `POST /create-gopay-payment` - create a gateway payment for an order.
//! - `POST /gopay-webhook`, `GET /gopay-webhook?id=` - reconcile an order with its payment.
//! - `POST /send-order-email` - send the order confirmation email.
//! - `GET /health` - liveness probe.
//!
//! Any `OPTIONS` request is answered with 204 and CORS headers.

mod cors;
mod errors;
mod handlers;

use crate::application::checkout::CheckoutService;
use crate::application::notification::OrderMailer;
use crate::application::reconciliation::PaymentReconciler;
use crate::config::Config;
use crate::domain::ports::{EmailSenderBox, OrderStoreBox, PaymentGatewayBox};
use crate::infrastructure::gopay::GopayClient;
use crate::infrastructure::in_memory::InMemoryOrderStore;
use crate::infrastructure::resend::ResendClient;
use crate::infrastructure::supabase::SupabaseOrderStore;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use cors::cors;

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub checkout: Arc<CheckoutService>,
    pub reconciler: Arc<PaymentReconciler>,
    pub mailer: Arc<OrderMailer>,
}

impl AppState {
    pub fn new(
        checkout: CheckoutService,
        reconciler: PaymentReconciler,
        mailer: OrderMailer,
    ) -> Self {
        Self {
            checkout: Arc::new(checkout),
            reconciler: Arc::new(reconciler),
            mailer: Arc::new(mailer),
        }
    }

    /// Wires the GoPay, Supabase and Resend adapters described by `config`.
    ///
    /// Without Supabase settings orders live in memory and are lost on exit.
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::new();
        let gopay = GopayClient::new(client.clone(), config.gopay.clone());

        let orders: OrderStoreBox = if let Some(supabase) = &config.supabase {
            Box::new(SupabaseOrderStore::new(client.clone(), supabase.clone()))
        } else {
            tracing::warn!(
                "WARNING: Supabase is not configured. Falling back to the in-memory order store."
            );
            Box::new(InMemoryOrderStore::new())
        };

        let checkout_gateway: PaymentGatewayBox = Box::new(gopay.clone());
        let webhook_gateway: PaymentGatewayBox = Box::new(gopay);
        let sender: EmailSenderBox = Box::new(ResendClient::new(client, config.resend.clone()));

        Self::new(
            CheckoutService::new(checkout_gateway, &config.gopay),
            PaymentReconciler::new(webhook_gateway, orders),
            OrderMailer::new(sender, config.resend.from.clone()),
        )
    }
}

/// Build the axum `Router` serving all endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/create-gopay-payment", post(handlers::create_payment))
        .route(
            "/gopay-webhook",
            post(handlers::payment_webhook).get(handlers::payment_notification),
        )
        .route("/send-order-email", post(handlers::send_order_email))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cors))
}

/// Serve the endpoints at `addr` until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state)).await
}
