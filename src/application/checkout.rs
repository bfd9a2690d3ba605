use crate::config::GopayConfig;
use crate::domain::payment::PaymentIntent;
use crate::domain::ports::PaymentGatewayBox;
use crate::error::Result;
use serde_json::Value;

/// Creates gateway payments for new orders.
pub struct CheckoutService {
    gateway: PaymentGatewayBox,
    goid: u64,
    lang: String,
}

impl CheckoutService {
    /// Creates a new `CheckoutService`.
    ///
    /// # Arguments
    ///
    /// * `gateway` - The payment gateway payments are created on.
    /// * `config` - Supplies the merchant account (`goid`) and payment page language.
    pub fn new(gateway: PaymentGatewayBox, config: &GopayConfig) -> Self {
        Self {
            gateway,
            goid: config.goid,
            lang: config.lang.clone(),
        }
    }

    /// Obtains a fresh access token and creates the payment.
    ///
    /// The gateway's response body, including its redirect URL, is returned
    /// unchanged. A rejected token request stops before any payment is created.
    pub async fn create_payment(&self, intent: PaymentIntent) -> Result<Value> {
        let token = self.gateway.access_token().await?;
        let payment = intent.into_gateway_payment(self.goid, &self.lang);

        tracing::info!(
            order_number = %payment.order_number,
            amount = payment.amount,
            currency = %payment.currency,
            "creating payment"
        );
        self.gateway.create_payment(&token, &payment).await
    }
}
