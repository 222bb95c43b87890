pub mod health;
pub mod orders;
pub mod totals;

pub use health::*;
pub use orders::*;
pub use totals::*;

use crate::{
    config::PaypalEnvironment,
    services::{LedgerStore, OrderService},
};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub ledger: Arc<LedgerStore>,
    pub environment: PaypalEnvironment,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        orders: Arc<OrderService>,
        ledger: Arc<LedgerStore>,
        environment: PaypalEnvironment,
    ) -> Self {
        Self {
            orders,
            ledger,
            environment,
            started_at: Instant::now(),
        }
    }
}
