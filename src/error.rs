use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("Failed to obtain GoPay access token (status {status})")]
    GatewayAuth { status: u16 },
    #[error("{0}")]
    GatewayPayment(String),
    #[error("{0}")]
    Persistence(String),
    #[error("Payment {0} is referenced by more than one order")]
    AmbiguousOrder(String),
    #[error("{0}")]
    EmailDelivery(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CheckoutError {
    /// HTTP status reported to the caller. Only missing input is a client error.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::BadRequest(_) => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
