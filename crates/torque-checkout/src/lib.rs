//! # torque-checkout: Checkout Pipeline for Torque POS
//!
//! Sequencing and reconciliation on top of [`torque_core`] rules and a
//! [`torque_remote::SalesBackend`].
//!
//! ## Modules
//!
//! - [`orchestrator`] - Cart → sale → payment, with one read-back on doubt
//! - [`verify`] - Payment read-back (Confirmed / NotFound / Inconclusive)
//! - [`settlement`] - Cash settlement of open credit sales
//! - [`book`] - Local Paid / Credit views of recorded sales
//! - [`gate`] - One checkout at a time per register
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! let backend: Arc<dyn SalesBackend> = Arc::new(HttpBackend::new(&config.backend)?);
//! let book = SaleBook::new();
//! let checkout = Checkout::new(backend.clone(), book.clone());
//!
//! let request = CheckoutRequest::new("0712345678", CheckoutMethod::Cash);
//! let outcome = checkout.run(&mut cart, &request).await?;
//! println!("{}", outcome.message());
//! ```

pub mod book;
pub mod error;
pub mod gate;
pub mod orchestrator;
pub mod settlement;
pub mod verify;

#[cfg(test)]
mod testing;

pub use book::{BookEntry, SaleBook};
pub use error::{CheckoutError, SettlementError};
pub use gate::{CheckoutGate, CheckoutPermit};
pub use orchestrator::{Checkout, CheckoutMethod, CheckoutOutcome, CheckoutRequest};
pub use settlement::{CreditPaymentUpdater, Settlement};
pub use verify::{verify_write, WriteVerification};
