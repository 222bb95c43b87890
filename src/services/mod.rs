pub mod ledger;
pub mod orders;
pub mod paypal;

pub use ledger::LedgerStore;
pub use orders::{CaptureOutcome, OrderService};
pub use paypal::{PaymentGateway, PaypalClient};
