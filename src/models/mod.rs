pub mod paypal;
pub mod response;
pub mod transaction;

pub use paypal::*;
pub use response::*;
pub use transaction::*;
