use crate::{
    error::DonationError,
    models::{CaptureSummary, CreateOrderRequest, Transaction},
    services::{LedgerStore, PaymentGateway},
};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

const DEFAULT_AMOUNT: Decimal = Decimal::TEN;
const DEFAULT_CURRENCY: &str = "INR";

/// Result of a successful capture.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub transaction: Transaction,
    pub warnings: Vec<String>,
}

/// Drives the create/capture flow against the payment gateway and records
/// completed captures in the ledger.
pub struct OrderService {
    gateway: Arc<dyn PaymentGateway>,
    ledger: Arc<LedgerStore>,
}

impl OrderService {
    pub fn new(gateway: Arc<dyn PaymentGateway>, ledger: Arc<LedgerStore>) -> Self {
        Self { gateway, ledger }
    }

    pub fn credentials_configured(&self) -> bool {
        self.gateway.credentials_configured()
    }

    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<String, DonationError> {
        let amount = request.amount.unwrap_or(DEFAULT_AMOUNT);
        let currency = request
            .currency
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let order_id = self.gateway.create_order(amount, &currency).await?;

        tracing::info!("Order {} created for {} {}", order_id, amount, currency);
        Ok(order_id)
    }

    pub async fn capture_order(&self, order_id: Option<String>) -> Result<CaptureOutcome, DonationError> {
        let order_id = order_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DonationError::Validation("orderID required".to_string()))?;

        let raw = self.gateway.capture_order(&order_id).await?;

        if raw.get("status").and_then(|s| s.as_str()) == Some("ERROR") {
            tracing::error!("PayPal reported capture error for order {}: {}", order_id, raw);
            return Err(DonationError::UpstreamCapture { details: raw });
        }

        let summary = CaptureSummary::from_response(&raw);
        if summary.is_partial() {
            tracing::warn!(
                order_id = %order_id,
                warnings = ?summary.warnings,
                "Capture response only partially understood"
            );
        }

        let transaction = Transaction {
            id: summary.capture_id.unwrap_or_else(|| order_id.clone()),
            order_id,
            amount: summary.amount.unwrap_or(Decimal::ZERO),
            currency: summary.currency.unwrap_or_default(),
            payer: summary.payer,
            raw,
            created_at: Utc::now(),
        };

        self.ledger.append(transaction.clone()).await?;

        tracing::info!(
            "Capture {} recorded for order {}: {} {}",
            transaction.id,
            transaction.order_id,
            transaction.amount,
            transaction.currency
        );

        Ok(CaptureOutcome {
            transaction,
            warnings: summary.warnings,
        })
    }
}
