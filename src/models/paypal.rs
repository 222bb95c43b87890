//! Wire types for the PayPal REST API and the extraction of a capture response
//! into ledger fields.

use crate::models::Payer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub intent: &'static str,
    pub purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseUnit {
    pub amount: Money,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub currency_code: String,
    pub value: String,
}

impl OrderRequest {
    pub fn capture(amount: Decimal, currency: &str, description: &str) -> Self {
        Self {
            intent: "CAPTURE",
            purchase_units: vec![PurchaseUnit {
                amount: Money {
                    currency_code: currency.to_string(),
                    value: format_amount(amount),
                },
                description: description.to_string(),
            }],
        }
    }
}

/// Formats an amount with exactly two decimal places, rounding half away from zero.
pub fn format_amount(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Fields pulled out of a capture response, each of which may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureSummary {
    pub capture_id: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub payer: Payer,
    pub warnings: Vec<String>,
}

impl CaptureSummary {
    pub fn from_response(raw: &Value) -> Self {
        let mut summary = CaptureSummary {
            payer: extract_payer(raw),
            ..Default::default()
        };

        let first_capture = raw
            .pointer("/purchase_units/0/payments/captures")
            .and_then(Value::as_array)
            .and_then(|captures| captures.first());

        match first_capture {
            Some(capture) => {
                summary.capture_id = capture.get("id").and_then(Value::as_str).map(str::to_string);
                if summary.capture_id.is_none() {
                    summary.warnings.push("capture has no id".to_string());
                }

                summary.amount = match capture.pointer("/amount/value") {
                    Some(value) => {
                        let parsed = parse_decimal(value);
                        if parsed.is_none() {
                            summary
                                .warnings
                                .push(format!("capture amount is not a number: {}", value));
                        }
                        parsed
                    }
                    None => {
                        summary.warnings.push("capture has no amount".to_string());
                        None
                    }
                };

                summary.currency = capture
                    .pointer("/amount/currency_code")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                if summary.currency.is_none() {
                    summary.warnings.push("capture has no currency".to_string());
                }
            }
            None => {
                summary
                    .warnings
                    .push("response has no payment captures".to_string());
                summary.capture_id = raw.get("id").and_then(Value::as_str).map(str::to_string);
                if summary.capture_id.is_none() {
                    summary.warnings.push("response has no id".to_string());
                }
            }
        }

        summary
    }

    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

fn extract_payer(raw: &Value) -> Payer {
    let payer = raw.get("payer");
    let name_part = |field: &str| {
        payer
            .and_then(|p| p.pointer(&format!("/name/{}", field)))
            .and_then(Value::as_str)
            .unwrap_or_default()
    };

    Payer {
        name: format!("{} {}", name_part("given_name"), name_part("surname"))
            .trim()
            .to_string(),
        email: payer
            .and_then(|p| p.get("email_address"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}
