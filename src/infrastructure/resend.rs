use crate::config::ResendConfig;
use crate::domain::order_email::{EmailReceipt, OutgoingEmail};
use crate::domain::ports::EmailSender;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Clone)]
pub struct ResendClient {
    client: reqwest::Client,
    config: ResendConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ResendError {
    #[serde(default)]
    message: Option<String>,
}

impl ResendClient {
    pub fn new(client: reqwest::Client, config: ResendConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl EmailSender for ResendClient {
    #[tracing::instrument(skip_all, err, fields(subject = %email.subject))]
    async fn send(&self, email: &OutgoingEmail) -> Result<EmailReceipt> {
        let response = self
            .client
            .post(format!("{}/emails", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(&self.config.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error: ResendError = serde_json::from_str(&text).unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %text, "Resend rejected email");
            return Err(CheckoutError::EmailDelivery(error.message.unwrap_or(text)));
        }

        Ok(response.json().await?)
    }
}
