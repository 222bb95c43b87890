use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency whose captures count toward the running total.
pub const TOTAL_CURRENCY: &str = "INR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// One completed capture as persisted in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub payer: Payer,
    #[serde(default)]
    pub raw: serde_json::Value,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn counts_toward_total(&self) -> bool {
        self.currency == TOTAL_CURRENCY
    }
}

/// Full contents of the ledger file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(rename = "totalINR", default, with = "rust_decimal::serde::float")]
    pub total_inr: Decimal,
}

impl LedgerState {
    pub fn append(&mut self, txn: Transaction) {
        if txn.counts_toward_total() {
            self.total_inr += txn.amount;
        }
        self.transactions.push(txn);
    }

    /// Last `limit` transactions, newest first.
    pub fn recent(&self, limit: usize) -> Vec<Transaction> {
        self.transactions.iter().rev().take(limit).cloned().collect()
    }
}
