use crate::models::Transaction;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateOrderResponse {
    #[serde(rename = "orderID")]
    pub order_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptureOrderRequest {
    #[serde(rename = "orderID", default)]
    pub order_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CaptureOrderResponse {
    pub success: bool,
    #[serde(rename = "captureId")]
    pub capture_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TotalsResponse {
    #[serde(rename = "totalINR", with = "rust_decimal::serde::float")]
    pub total_inr: Decimal,
    pub transactions: Vec<Transaction>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub paypal_environment: String,
    pub credentials_configured: bool,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}
