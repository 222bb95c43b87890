use anyhow::{bail, Context, Result};
use std::path::PathBuf;

const LIVE_API_BASE: &str = "https://api-m.paypal.com";
const SANDBOX_API_BASE: &str = "https://api-m.sandbox.paypal.com";
const DEFAULT_ORDER_DESCRIPTION: &str = "Donation to Code Crimson - menstrual health fundraiser";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaypalEnvironment {
    Sandbox,
    Live,
}

impl PaypalEnvironment {
    pub fn api_base(&self) -> &'static str {
        match self {
            PaypalEnvironment::Sandbox => SANDBOX_API_BASE,
            PaypalEnvironment::Live => LIVE_API_BASE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaypalEnvironment::Sandbox => "sandbox",
            PaypalEnvironment::Live => "live",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    // PayPal
    pub paypal_environment: PaypalEnvironment,
    pub paypal_client_id: Option<String>,
    pub paypal_secret: Option<String>,
    pub paypal_api_base: String,
    pub paypal_timeout_secs: u64,
    pub order_description: String,

    // Storage & static assets
    pub store_path: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let paypal_environment = Self::parse_environment(lookup("PAYPAL_ENV"))?;
        let paypal_api_base = lookup("PAYPAL_API_BASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| paypal_environment.api_base().to_string());

        let config = Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,

            paypal_environment,
            paypal_client_id: Self::non_empty(lookup("PAYPAL_CLIENT_ID")),
            paypal_secret: Self::non_empty(lookup("PAYPAL_SECRET")),
            paypal_api_base: paypal_api_base.trim_end_matches('/').to_string(),
            paypal_timeout_secs: lookup("PAYPAL_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .context("Invalid PAYPAL_TIMEOUT_SECS")?,
            order_description: lookup("ORDER_DESCRIPTION")
                .unwrap_or_else(|| DEFAULT_ORDER_DESCRIPTION.to_string()),

            store_path: lookup("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data").join("store.json")),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn credentials_configured(&self) -> bool {
        self.paypal_client_id.is_some() && self.paypal_secret.is_some()
    }

    fn parse_environment(value: Option<String>) -> Result<PaypalEnvironment> {
        let env = value.unwrap_or_else(|| "sandbox".to_string());

        match env.trim().to_lowercase().as_str() {
            "" | "sandbox" => Ok(PaypalEnvironment::Sandbox),
            "live" | "production" | "prod" => Ok(PaypalEnvironment::Live),
            _ => bail!("Unknown PAYPAL_ENV: {}", env),
        }
    }

    fn non_empty(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.is_empty())
    }

    fn validate(&self) -> Result<()> {
        if !self.paypal_api_base.starts_with("http") {
            bail!("PAYPAL_API_BASE must be HTTP(S) URL");
        }
        if self.paypal_timeout_secs == 0 {
            bail!("PAYPAL_TIMEOUT_SECS must be positive");
        }

        tracing::info!(
            "Configuration validated for {} environment",
            self.paypal_environment.as_str()
        );

        Ok(())
    }
}
