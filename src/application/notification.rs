use crate::domain::order_email::{EmailReceipt, OrderEmailRequest};
use crate::domain::ports::EmailSenderBox;
use crate::error::Result;

/// Sends order confirmation emails from a fixed sender address.
pub struct OrderMailer {
    sender: EmailSenderBox,
    from: String,
}

impl OrderMailer {
    pub fn new(sender: EmailSenderBox, from: impl Into<String>) -> Self {
        Self {
            sender,
            from: from.into(),
        }
    }

    pub async fn send_confirmation(&self, request: OrderEmailRequest) -> Result<EmailReceipt> {
        let email = request.render(&self.from);
        let receipt = self.sender.send(&email).await?;
        tracing::info!(order_id = %request.order_id, email_id = %receipt.id, "order email sent");
        Ok(receipt)
    }
}
