use crate::{
    error::DonationError,
    models::{LedgerState, TotalsResponse, Transaction},
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Number of transactions returned by the totals query.
pub const RECENT_TRANSACTIONS: usize = 20;

/// File-backed record of completed captures and the running INR total.
///
/// Every mutation goes through `write_lock`, so a read-modify-write on the
/// capture path cannot interleave with another writer in this process.
pub struct LedgerStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the ledger, falling back to an empty one when the file is
    /// missing or cannot be parsed.
    pub async fn read(&self) -> LedgerState {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Ledger file {} not found, starting empty", self.path.display());
                return LedgerState::default();
            }
            Err(e) => {
                tracing::warn!(
                    "Ledger file {} unreadable: {}, using empty ledger",
                    self.path.display(),
                    e
                );
                return LedgerState::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    "Ledger file {} is malformed: {}, using empty ledger",
                    self.path.display(),
                    e
                );
                LedgerState::default()
            }
        }
    }

    /// Replaces the stored ledger wholesale.
    pub async fn write(&self, state: &LedgerState) -> Result<(), DonationError> {
        let _guard = self.write_lock.lock().await;
        self.persist(state).await
    }

    /// Appends a transaction and returns the updated ledger.
    pub async fn append(&self, txn: Transaction) -> Result<LedgerState, DonationError> {
        let _guard = self.write_lock.lock().await;

        let mut state = self.read().await;
        state.append(txn);
        self.persist(&state).await?;

        tracing::debug!(
            "Ledger now holds {} transactions, total INR {}",
            state.transactions.len(),
            state.total_inr
        );

        Ok(state)
    }

    pub async fn totals(&self) -> TotalsResponse {
        let state = self.read().await;
        TotalsResponse {
            total_inr: state.total_inr,
            transactions: state.recent(RECENT_TRANSACTIONS),
        }
    }

    async fn persist(&self, state: &LedgerState) -> Result<(), DonationError> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let serialized = serde_json::to_vec_pretty(state)
            .map_err(|e| DonationError::Internal(format!("Failed to serialize ledger: {}", e)))?;

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, serialized).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
