use crate::error::{CheckoutError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Gateway-assigned payment identifier.
///
/// GoPay issues numeric ids, but callers send them either as JSON numbers or
/// strings, so the id is carried as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CheckoutError::BadRequest("Missing payment id".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// OAuth2 bearer token issued by the gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Lifecycle state of a payment object as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayState {
    Created,
    PaymentMethodChosen,
    Authorized,
    Paid,
    Canceled,
    Timeouted,
    Refunded,
    PartiallyRefunded,
    /// Any state outside the known vocabulary, kept verbatim.
    Other(String),
}

impl GatewayState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "CREATED" => Self::Created,
            "PAYMENT_METHOD_CHOSEN" => Self::PaymentMethodChosen,
            "AUTHORIZED" => Self::Authorized,
            "PAID" => Self::Paid,
            "CANCELED" => Self::Canceled,
            "TIMEOUTED" => Self::Timeouted,
            "REFUNDED" => Self::Refunded,
            "PARTIALLY_REFUNDED" => Self::PartiallyRefunded,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "CREATED",
            Self::PaymentMethodChosen => "PAYMENT_METHOD_CHOSEN",
            Self::Authorized => "AUTHORIZED",
            Self::Paid => "PAID",
            Self::Canceled => "CANCELED",
            Self::Timeouted => "TIMEOUTED",
            Self::Refunded => "REFUNDED",
            Self::PartiallyRefunded => "PARTIALLY_REFUNDED",
            Self::Other(raw) => raw,
        }
    }

    pub fn payment_status(&self) -> PaymentStatus {
        match self {
            Self::Paid => PaymentStatus::Paid,
            Self::Canceled | Self::Timeouted => PaymentStatus::Failed,
            Self::Refunded => PaymentStatus::Refunded,
            _ => PaymentStatus::Unpaid,
        }
    }

    pub fn order_status(&self) -> OrderStatus {
        match self {
            Self::Paid => OrderStatus::Active,
            Self::Canceled | Self::Timeouted => OrderStatus::Cancelled,
            _ => OrderStatus::Pending,
        }
    }
}

impl fmt::Display for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GatewayState {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GatewayState {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Active,
    Cancelled,
}

/// The complete set of columns written to an order row after a webhook.
///
/// Derived purely from the fetched gateway state, never from prior local state.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderStatusUpdate {
    pub payment_id: PaymentId,
    pub gateway_status: GatewayState,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub paid_at: Option<DateTime<Utc>>,
}

impl OrderStatusUpdate {
    pub fn from_state(payment_id: PaymentId, state: GatewayState, now: DateTime<Utc>) -> Self {
        let paid_at = (state == GatewayState::Paid).then_some(now);
        Self {
            payment_id,
            payment_status: state.payment_status(),
            order_status: state.order_status(),
            gateway_status: state,
            paid_at,
        }
    }
}

/// Payment object as returned by the gateway's status lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPaymentStatus {
    pub state: GatewayState,
    #[serde(default)]
    pub order_number: Option<String>,
}

/// Body of the payment-creation request sent by the ordering front-end.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Amount in minor currency units.
    pub amount: u64,
    pub currency: String,
    #[serde(rename = "orderId", deserialize_with = "string_or_number")]
    pub order_id: String,
    pub description: String,
    pub return_url: String,
    pub notify_url: String,
    #[serde(default)]
    pub payer: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentTarget {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub goid: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentCallback {
    pub return_url: String,
    pub notification_url: String,
}

/// Payload submitted to the gateway's payment-creation endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GatewayPayment {
    pub payer: Map<String, Value>,
    pub target: PaymentTarget,
    pub amount: u64,
    pub currency: String,
    pub order_number: String,
    pub order_description: String,
    pub callback: PaymentCallback,
    pub lang: String,
}

/// Card-only payer configuration used unless the caller overrides it.
pub fn default_payer() -> Map<String, Value> {
    let mut payer = Map::new();
    payer.insert(
        "allowed_payment_instruments".to_string(),
        Value::Array(vec![Value::String("PAYMENT_CARD".to_string())]),
    );
    payer.insert(
        "default_payment_instrument".to_string(),
        Value::String("PAYMENT_CARD".to_string()),
    );
    payer
}

impl PaymentIntent {
    pub fn into_gateway_payment(self, goid: u64, lang: &str) -> GatewayPayment {
        let mut payer = default_payer();
        if let Some(overrides) = self.payer {
            payer.extend(overrides);
        }

        GatewayPayment {
            payer,
            target: PaymentTarget {
                kind: "ACCOUNT",
                goid,
            },
            amount: self.amount,
            currency: self.currency,
            order_number: self.order_id,
            order_description: self.description,
            callback: PaymentCallback {
                return_url: self.return_url,
                notification_url: self.notify_url,
            },
            lang: lang.to_string(),
        }
    }
}

/// Body of a payment notification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentNotification {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,
}

impl PaymentNotification {
    pub fn payment_id(&self) -> Result<PaymentId> {
        match &self.id {
            Some(id) => PaymentId::new(id.as_str()),
            None => Err(CheckoutError::BadRequest("Missing payment id".to_string())),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}
