use crate::config::SupabaseConfig;
use crate::domain::payment::OrderStatusUpdate;
use crate::domain::ports::{OrderStore, UpdateOutcome};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::json;

/// Asks PostgREST for exactly one row. A mutation that touches any other
/// number of rows is rolled back and answered with 406 / PGRST116.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const SINGULAR_VIOLATION: &str = "PGRST116";

/// Order table access through Supabase's PostgREST interface, authenticated
/// with the service-role key.
#[derive(Clone)]
pub struct SupabaseOrderStore {
    client: reqwest::Client,
    config: SupabaseConfig,
}

#[derive(Debug, Default, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

impl SupabaseOrderStore {
    pub fn new(client: reqwest::Client, config: SupabaseConfig) -> Self {
        Self { client, config }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.orders_table
        )
    }
}

/// Number of rows PostgREST reported in a PGRST116 detail message, e.g.
/// "The result contains 0 rows" or "Results contain 2 rows, ...".
fn matched_rows(details: &str) -> Option<u64> {
    details
        .split(|c: char| !c.is_ascii_digit())
        .find(|part| !part.is_empty())
        .and_then(|digits| digits.parse().ok())
}

#[async_trait]
impl OrderStore for SupabaseOrderStore {
    #[tracing::instrument(skip_all, err, fields(payment_id = %update.payment_id))]
    async fn apply_status(&self, update: &OrderStatusUpdate) -> Result<UpdateOutcome> {
        let body = json!({
            "gopay_status": update.gateway_status.as_str(),
            "payment_status": update.payment_status,
            "status": update.order_status,
            "paid_at": update.paid_at,
        });

        let response = self
            .client
            .patch(self.table_url())
            .query(&[("gopay_payment_id", format!("eq.{}", update.payment_id))])
            .header("apikey", &self.config.service_role_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.service_role_key))
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(UpdateOutcome::Updated);
        }

        let text = response.text().await.unwrap_or_default();
        let error: PostgrestError = serde_json::from_str(&text).unwrap_or_default();

        if status == StatusCode::NOT_ACCEPTABLE
            && error.code.as_deref() == Some(SINGULAR_VIOLATION)
        {
            match error.details.as_deref().and_then(matched_rows) {
                Some(0) => return Ok(UpdateOutcome::NoMatchingOrder),
                Some(_) => {
                    return Err(CheckoutError::AmbiguousOrder(update.payment_id.to_string()));
                }
                None => {}
            }
        }

        tracing::error!(status = status.as_u16(), body = %text, "order update failed");
        Err(CheckoutError::Persistence(error.message.unwrap_or(text)))
    }
}
