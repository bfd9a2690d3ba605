use clap::Parser;
use clap::builder::BoolishValueParser;
use hosting_checkout::config::{
    Config, DEFAULT_GOPAY_LANG, DEFAULT_ORDER_EMAIL_FROM, DEFAULT_ORDERS_TABLE, GatewayEnvironment,
    GopayConfig, RESEND_API_URL, ResendConfig, SupabaseConfig,
};
use hosting_checkout::interfaces::http::{self, AppState};
use miette::{IntoDiagnostic, Result};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Use the production gateway instead of the sandbox
    #[arg(long, env = "GOPAY_IS_PRODUCTION", value_parser = BoolishValueParser::new())]
    gopay_is_production: bool,

    /// Merchant account (GoID) payments are credited to
    #[arg(long, env = "GOPAY_GOID")]
    gopay_goid: u64,

    #[arg(long, env = "GOPAY_CLIENT_ID")]
    gopay_client_id: String,

    #[arg(long, env = "GOPAY_CLIENT_SECRET", hide_env_values = true)]
    gopay_client_secret: String,

    /// Overrides the API root selected by --gopay-is-production
    #[arg(long, env = "GOPAY_API_URL")]
    gopay_api_url: Option<String>,

    /// Language of the gateway payment page
    #[arg(long, env = "GOPAY_LANG", default_value = DEFAULT_GOPAY_LANG)]
    gopay_lang: String,

    /// Supabase project URL. Without it orders are kept in memory.
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    supabase_service_role_key: Option<String>,

    #[arg(long, env = "ORDERS_TABLE", default_value = DEFAULT_ORDERS_TABLE)]
    orders_table: String,

    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    resend_api_key: String,

    #[arg(long, env = "RESEND_API_URL", default_value = RESEND_API_URL)]
    resend_api_url: String,

    /// Sender of order confirmation emails
    #[arg(long, env = "ORDER_EMAIL_FROM", default_value = DEFAULT_ORDER_EMAIL_FROM)]
    order_email_from: String,

    /// Validate the configuration and exit without serving
    #[arg(long)]
    check_config: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let environment = GatewayEnvironment::from_production_flag(self.gopay_is_production);
        let mut gopay = GopayConfig::new(
            environment,
            self.gopay_goid,
            self.gopay_client_id,
            self.gopay_client_secret,
        );
        gopay.lang = self.gopay_lang;
        if let Some(url) = self.gopay_api_url {
            gopay = gopay.with_base_url(url);
        }

        // Half-configured Supabase is kept so that validation reports it.
        let supabase = match (self.supabase_url, self.supabase_service_role_key) {
            (None, None) => None,
            (url, key) => {
                let mut supabase =
                    SupabaseConfig::new(url.unwrap_or_default(), key.unwrap_or_default());
                supabase.orders_table = self.orders_table;
                Some(supabase)
            }
        };

        let mut resend = ResendConfig::new(self.resend_api_key);
        resend.base_url = self.resend_api_url;
        resend.from = self.order_email_from;

        Config {
            listen_addr: self.listen,
            gopay,
            supabase,
            resend,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let check_only = cli.check_config;
    let config = cli.into_config();
    config.validate().into_diagnostic()?;

    let state = AppState::from_config(&config);
    tracing::info!(
        gopay = %config.gopay.base_url,
        goid = config.gopay.goid,
        "configuration loaded"
    );

    if check_only {
        return Ok(());
    }

    http::serve(state, config.listen_addr).await.into_diagnostic()?;
    Ok(())
}
