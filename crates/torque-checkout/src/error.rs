//! Checkout and settlement errors.
//!
//! Only failures that stop a pipeline before the sale exists are errors.
//! Anything that happens after the sale write succeeded is reported as a
//! [`crate::CheckoutOutcome`] instead, because the sale is real either way.

use thiserror::Error;
use torque_core::{SaleId, ValidationError};
use torque_remote::RemoteError;

/// Why a checkout did not create a sale.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Local precondition failed. No network call was made.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Another checkout on this register has not finished.
    #[error("A checkout is already in progress")]
    InFlight,

    /// The sale write failed. The cart is untouched and may be retried.
    #[error("Sale could not be created: {0}")]
    SaleCreation(#[source] RemoteError),
}

/// Why a credit settlement was not recorded.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Sale {0} is not in the sale book")]
    UnknownSale(SaleId),

    #[error("Sale {0} is not a credit sale")]
    NotCredit(SaleId),

    #[error("Sale {0} has nothing outstanding")]
    NothingOutstanding(SaleId),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The payment write failed. The operator can check and retry.
    #[error("Payment could not be recorded: {0}")]
    Remote(#[from] RemoteError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_sale_id() {
        let err = SettlementError::NotCredit(SaleId::from("77"));
        assert_eq!(err.to_string(), "Sale 77 is not a credit sale");
    }

    #[test]
    fn test_validation_conversion() {
        let err: CheckoutError = ValidationError::EmptyCart.into();
        assert!(matches!(err, CheckoutError::Validation(ValidationError::EmptyCart)));
    }
}
