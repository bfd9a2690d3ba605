use crate::config::GopayConfig;
use crate::domain::payment::{AccessToken, GatewayPayment, GatewayPaymentStatus, PaymentId};
use crate::domain::ports::PaymentGateway;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;

const TOKEN_SCOPE: &str = "payment-all";

/// GoPay REST API client.
///
/// Every call is a single request with reqwest's default timeouts; nothing
/// is cached between calls, so each handler invocation fetches its own token.
#[derive(Clone)]
pub struct GopayClient {
    client: reqwest::Client,
    config: GopayConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GopayClient {
    pub fn new(client: reqwest::Client, config: GopayConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Lookup URL for one payment. The id is pushed as a single
    /// percent-encoded segment so it can never address another resource.
    fn payment_url(&self, id: &PaymentId) -> Result<Url> {
        let base = self.url("/payments/payment");
        let mut url =
            Url::parse(&base).map_err(|e| CheckoutError::Config(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| CheckoutError::Config(format!("{base} cannot carry a path")))?
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl PaymentGateway for GopayClient {
    #[tracing::instrument(skip_all, err)]
    async fn access_token(&self) -> Result<AccessToken> {
        let response = self
            .client
            .post(self.url("/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials"), ("scope", TOKEN_SCOPE)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "GoPay rejected token request");
            return Err(CheckoutError::GatewayAuth {
                status: status.as_u16(),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(AccessToken::new(token.access_token))
    }

    #[tracing::instrument(skip_all, err, fields(order_number = %payment.order_number))]
    async fn create_payment(&self, token: &AccessToken, payment: &GatewayPayment) -> Result<Value> {
        let response = self
            .client
            .post(self.url("/payments/payment"))
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/json")
            .json(payment)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "GoPay payment creation failed");
            return Err(CheckoutError::GatewayPayment(body));
        }

        Ok(response.json().await?)
    }

    #[tracing::instrument(skip_all, err, fields(payment_id = %id))]
    async fn payment_status(
        &self,
        token: &AccessToken,
        id: &PaymentId,
    ) -> Result<GatewayPaymentStatus> {
        let response = self
            .client
            .get(self.payment_url(id)?)
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "GoPay payment lookup failed");
            return Err(CheckoutError::GatewayPayment(body));
        }

        Ok(response.json().await?)
    }
}
