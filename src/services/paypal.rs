use crate::{
    config::Config,
    error::DonationError,
    models::{OrderRequest, TokenResponse},
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Url};
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Duration;

/// Remote payment provider consumed by the order orchestrator.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a pending order and returns the provider-issued order id.
    async fn create_order(&self, amount: Decimal, currency: &str) -> Result<String, DonationError>;

    /// Captures an approved order and returns the raw provider response.
    async fn capture_order(&self, order_id: &str) -> Result<Value, DonationError>;

    fn credentials_configured(&self) -> bool;
}

#[derive(Clone)]
struct Credentials {
    client_id: String,
    secret: String,
}

pub struct PaypalClient {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
    order_description: String,
}

impl PaypalClient {
    pub fn new(
        base_url: &str,
        client_id: Option<String>,
        secret: Option<String>,
        timeout: Duration,
        order_description: impl Into<String>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid PayPal API base: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("PayPal API base cannot carry a path: {}", base_url);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let credentials = match (client_id, secret) {
            (Some(client_id), Some(secret)) if !client_id.is_empty() && !secret.is_empty() => {
                Some(Credentials { client_id, secret })
            }
            _ => None,
        };

        Ok(Self {
            client,
            base_url,
            credentials,
            order_description: order_description.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.paypal_api_base,
            config.paypal_client_id.clone(),
            config.paypal_secret.clone(),
            Duration::from_secs(config.paypal_timeout_secs),
            config.order_description.clone(),
        )
    }

    /// Exchanges the client credentials for a bearer token.
    pub async fn access_token(&self) -> Result<String, DonationError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(DonationError::CredentialsMissing)?;

        let response = self
            .client
            .post(self.endpoint(&["v1", "oauth2", "token"])?)
            .basic_auth(&credentials.client_id, Some(&credentials.secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::error!("PayPal token exchange failed with {}: {}", status, body);
            return Err(DonationError::UpstreamAuth {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|_| DonationError::UpstreamAuth {
                status: status.as_u16(),
                body: body.clone(),
            })?;

        tracing::debug!(
            "PayPal token acquired (type: {:?}, expires in {:?}s)",
            token.token_type,
            token.expires_in
        );

        Ok(token.access_token)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DonationError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DonationError::Internal(format!("Invalid PayPal API base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl PaymentGateway for PaypalClient {
    async fn create_order(&self, amount: Decimal, currency: &str) -> Result<String, DonationError> {
        let token = self.access_token().await?;
        let request = OrderRequest::capture(amount, currency, &self.order_description);

        let response = self
            .client
            .post(self.endpoint(&["v2", "checkout", "orders"])?)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let order = parse_body(&response.text().await.unwrap_or_default());

        match order.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => {
                tracing::error!("PayPal order creation returned no id ({}): {}", status, order);
                Err(DonationError::UpstreamOrder { details: order })
            }
        }
    }

    async fn capture_order(&self, order_id: &str) -> Result<Value, DonationError> {
        let token = self.access_token().await?;

        let response = self
            .client
            .post(self.endpoint(&["v2", "checkout", "orders", order_id, "capture"])?)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let capture: Value = serde_json::from_str(&text).map_err(|_| {
            tracing::error!("PayPal capture returned a non-JSON body ({}): {}", status, text);
            DonationError::UpstreamCapture {
                details: Value::String(text.clone()),
            }
        })?;

        if !status.is_success() {
            tracing::error!("PayPal capture failed with {}: {}", status, capture);
            return Err(DonationError::UpstreamCapture { details: capture });
        }

        Ok(capture)
    }

    fn credentials_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
