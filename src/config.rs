use crate::error::{CheckoutError, Result};
use std::fmt;
use std::net::SocketAddr;

pub const GOPAY_SANDBOX_URL: &str = "https://gw.sandbox.gopay.com/api";
pub const GOPAY_PRODUCTION_URL: &str = "https://gate.gopay.cz/api";
pub const RESEND_API_URL: &str = "https://api.resend.com";
pub const DEFAULT_ORDERS_TABLE: &str = "orders";
pub const DEFAULT_ORDER_EMAIL_FROM: &str = "Objednávky <objednavky@hosting.cz>";
pub const DEFAULT_GOPAY_LANG: &str = "CS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayEnvironment {
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    pub fn from_production_flag(is_production: bool) -> Self {
        if is_production {
            Self::Production
        } else {
            Self::Sandbox
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => GOPAY_SANDBOX_URL,
            Self::Production => GOPAY_PRODUCTION_URL,
        }
    }
}

/// Merchant credentials and endpoint for the payment gateway.
#[derive(Clone)]
pub struct GopayConfig {
    pub base_url: String,
    pub goid: u64,
    pub client_id: String,
    pub client_secret: String,
    pub lang: String,
}

impl GopayConfig {
    pub fn new(
        environment: GatewayEnvironment,
        goid: u64,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: environment.base_url().to_string(),
            goid,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            lang: DEFAULT_GOPAY_LANG.to_string(),
        }
    }

    /// Points the client at a different API root, e.g. a local stand-in.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for GopayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GopayConfig")
            .field("base_url", &self.base_url)
            .field("goid", &self.goid)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("lang", &self.lang)
            .finish()
    }
}

#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_role_key: String,
    pub orders_table: String,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_role_key: service_role_key.into(),
            orders_table: DEFAULT_ORDERS_TABLE.to_string(),
        }
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_role_key", &"***")
            .field("orders_table", &self.orders_table)
            .finish()
    }
}

#[derive(Clone)]
pub struct ResendConfig {
    pub base_url: String,
    pub api_key: String,
    pub from: String,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: RESEND_API_URL.to_string(),
            api_key: api_key.into(),
            from: DEFAULT_ORDER_EMAIL_FROM.to_string(),
        }
    }
}

impl fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResendConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("from", &self.from)
            .finish()
    }
}

/// Everything the service needs, resolved once at start-up.
///
/// Handlers never read the process environment; they receive their slice of
/// this object when they are constructed.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub gopay: GopayConfig,
    /// `None` selects the in-memory order store.
    pub supabase: Option<SupabaseConfig>,
    pub resend: ResendConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("GoPay client id", &self.gopay.client_id),
            ("GoPay client secret", &self.gopay.client_secret),
            ("GoPay base URL", &self.gopay.base_url),
            ("Resend API key", &self.resend.api_key),
            ("order email sender", &self.resend.from),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(CheckoutError::Config(format!("{name} must not be empty")));
            }
        }

        if let Some(supabase) = &self.supabase
            && (supabase.url.trim().is_empty() || supabase.service_role_key.trim().is_empty())
        {
            return Err(CheckoutError::Config(
                "Supabase URL and service role key must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
