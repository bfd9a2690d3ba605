#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use hosting_checkout::config::{
    Config, GatewayEnvironment, GopayConfig, ResendConfig, SupabaseConfig,
};
use hosting_checkout::domain::order_email::{EmailReceipt, OutgoingEmail};
use hosting_checkout::domain::payment::{
    AccessToken, GatewayPayment, GatewayPaymentStatus, GatewayState, OrderStatusUpdate, PaymentId,
};
use hosting_checkout::domain::ports::{EmailSender, OrderStore, PaymentGateway, UpdateOutcome};
use hosting_checkout::error::{CheckoutError, Result};
use hosting_checkout::infrastructure::in_memory::InMemoryOrderStore;
use hosting_checkout::interfaces::http::{self, AppState};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const GOID: u64 = 8123456789;

/// Payment gateway double that records every call it receives.
#[derive(Clone)]
pub struct FakeGateway {
    reject_token: bool,
    lookup_error: Option<String>,
    payment_state: String,
    created: Value,
    calls: Arc<Mutex<Vec<String>>>,
    payments: Arc<Mutex<Vec<GatewayPayment>>>,
}

impl FakeGateway {
    pub fn with_state(state: &str) -> Self {
        Self {
            reject_token: false,
            lookup_error: None,
            payment_state: state.to_string(),
            created: json!({ "id": "123", "gw_url": "https://pay/123" }),
            calls: Arc::default(),
            payments: Arc::default(),
        }
    }

    pub fn rejecting_token() -> Self {
        Self {
            reject_token: true,
            ..Self::with_state("PAID")
        }
    }

    pub fn failing_lookup(body: &str) -> Self {
        Self {
            lookup_error: Some(body.to_string()),
            ..Self::with_state("PAID")
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn payments(&self) -> Vec<GatewayPayment> {
        self.payments.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn access_token(&self) -> Result<AccessToken> {
        self.calls.lock().unwrap().push("token".to_string());
        if self.reject_token {
            return Err(CheckoutError::GatewayAuth { status: 401 });
        }
        Ok(AccessToken::new("test-token"))
    }

    async fn create_payment(&self, _token: &AccessToken, payment: &GatewayPayment) -> Result<Value> {
        self.calls.lock().unwrap().push("create".to_string());
        self.payments.lock().unwrap().push(payment.clone());
        Ok(self.created.clone())
    }

    async fn payment_status(&self, _token: &AccessToken, id: &PaymentId) -> Result<GatewayPaymentStatus> {
        self.calls.lock().unwrap().push(format!("status:{id}"));
        if let Some(body) = &self.lookup_error {
            return Err(CheckoutError::GatewayPayment(body.clone()));
        }
        Ok(GatewayPaymentStatus {
            state: GatewayState::parse(&self.payment_state),
            order_number: None,
        })
    }
}

/// Order store wrapper counting how often it is asked to write.
#[derive(Clone, Default)]
pub struct RecordingOrderStore {
    pub inner: InMemoryOrderStore,
    fail: bool,
    writes: Arc<AtomicUsize>,
}

impl RecordingOrderStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderStore for RecordingOrderStore {
    async fn apply_status(&self, update: &OrderStatusUpdate) -> Result<UpdateOutcome> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CheckoutError::Persistence("connection refused".to_string()));
        }
        self.inner.apply_status(update).await
    }
}

/// Email sender double keeping every message it accepts.
#[derive(Clone, Default)]
pub struct FakeMailer {
    reject_with: Option<String>,
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl FakeMailer {
    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt> {
        if let Some(message) = &self.reject_with {
            return Err(CheckoutError::EmailDelivery(message.clone()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(EmailReceipt {
            id: format!("email-{}", sent.len()),
        })
    }
}

/// Canned responses served by [`start_upstream`].
#[derive(Clone)]
pub struct UpstreamConfig {
    pub token_status: u16,
    pub create_status: u16,
    pub create_body: Value,
    pub payment_state: String,
    pub lookup_status: u16,
    pub lookup_body: Value,
    pub patch_status: u16,
    pub patch_body: Value,
    pub email_status: u16,
    pub email_body: Value,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            token_status: 200,
            create_status: 200,
            create_body: json!({ "id": "123", "gw_url": "https://pay/123" }),
            payment_state: "PAID".to_string(),
            lookup_status: 200,
            lookup_body: json!({
                "errors": [{ "scope": "G", "error_code": 404, "error_name": "PAYMENT_NOT_FOUND" }]
            }),
            patch_status: 200,
            patch_body: json!({ "id": 1 }),
            email_status: 200,
            email_body: json!({ "id": "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794" }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub name: String,
    pub authorization: Option<String>,
    pub query: HashMap<String, String>,
    pub body: Value,
}

/// One in-process stand-in for GoPay (`/api`), PostgREST (`/rest/v1`) and Resend (`/emails`).
#[derive(Clone)]
pub struct Upstream {
    config: Arc<UpstreamConfig>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Upstream {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_names(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.name).collect()
    }

    fn record(&self, name: String, headers: &HeaderMap, query: HashMap<String, String>, body: Value) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(RecordedRequest {
            name,
            authorization,
            query,
            body,
        });
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

async fn token(State(up): State<Upstream>, headers: HeaderMap, body: String) -> (StatusCode, Json<Value>) {
    up.record("token".into(), &headers, HashMap::new(), Value::String(body));
    let code = up.config.token_status;
    if code == 200 {
        (
            status(code),
            Json(json!({ "token_type": "bearer", "access_token": "test-token", "expires_in": 1800 })),
        )
    } else {
        (status(code), Json(json!({ "errors": [{ "error_name": "AUTH_WRONG_CREDENTIALS" }] })))
    }
}

async fn create(State(up): State<Upstream>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    up.record("create".into(), &headers, HashMap::new(), body);
    (status(up.config.create_status), Json(up.config.create_body.clone()))
}

async fn payment(State(up): State<Upstream>, headers: HeaderMap, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    up.record(format!("status:{id}"), &headers, HashMap::new(), Value::Null);
    let code = up.config.lookup_status;
    if code != 200 {
        return (status(code), Json(up.config.lookup_body.clone()));
    }
    (
        status(code),
        Json(json!({
            "id": id.parse::<u64>().unwrap_or_default(),
            "order_number": "1024",
            "state": up.config.payment_state
        })),
    )
}

async fn update_orders(
    State(up): State<Upstream>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    up.record("patch".into(), &headers, query, body);
    (status(up.config.patch_status), Json(up.config.patch_body.clone()))
}

async fn emails(State(up): State<Upstream>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    up.record("email".into(), &headers, HashMap::new(), body);
    (status(up.config.email_status), Json(up.config.email_body.clone()))
}

/// Bind to port 0 and return the base URL together with the request log.
pub async fn start_upstream(config: UpstreamConfig) -> (String, Upstream) {
    let upstream = Upstream {
        config: Arc::new(config),
        requests: Arc::default(),
    };
    let app = Router::new()
        .route("/api/oauth2/token", post(token))
        .route("/api/payments/payment", post(create))
        .route("/api/payments/payment/:id", get(payment))
        .route("/rest/v1/orders", patch(update_orders))
        .route("/emails", post(emails))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), upstream)
}

pub fn config_for(upstream_base: &str) -> Config {
    let gopay = GopayConfig::new(GatewayEnvironment::Sandbox, GOID, "client-id", "client-secret")
        .with_base_url(format!("{upstream_base}/api"));
    let mut resend = ResendConfig::new("re_test_key");
    resend.base_url = upstream_base.to_string();

    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        gopay,
        supabase: Some(SupabaseConfig::new(upstream_base, "service-role-key")),
        resend,
    }
}

/// Starts the service wired to `upstream_base` and returns its base URL.
pub async fn start_app(upstream_base: &str) -> String {
    let state = AppState::from_config(&config_for(upstream_base));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, http::router(state)).await.unwrap();
    });
    format!("http://{addr}")
}
