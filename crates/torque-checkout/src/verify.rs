//! # Reconciliation Verifier
//!
//! Resolves a payment write whose outcome the register could not observe
//! (timeout, dropped connection, 5xx after commit) by reading back the
//! sale's payment list once.
//!
//! ```text
//! list_payments(sale) ──┬── Err ───────────────────────────► Inconclusive
//!                       │
//!                       └── Ok ──► any { method == m,
//!                                        |amount − expected| ≤ 0.01 }
//!                                      ├── yes ─────────────► Confirmed
//!                                      └── no ──────────────► NotFound
//! ```
//!
//! The check is a pure read and safe to repeat. It never resubmits the
//! write.

use serde::Serialize;
use torque_core::{Money, PaymentMethod, SaleId};
use torque_remote::SalesBackend;
use tracing::{debug, warn};

/// Result of reading back a payment write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum WriteVerification {
    /// A matching payment exists; the write went through.
    Confirmed,
    /// The payment list was read and holds no match.
    NotFound,
    /// The payment list could not be read.
    Inconclusive(String),
}

impl WriteVerification {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, WriteVerification::Confirmed)
    }
}

/// Checks whether a payment of `expected` by `method` is recorded for `sale_id`.
pub async fn verify_write(
    backend: &dyn SalesBackend,
    sale_id: &SaleId,
    expected: Money,
    method: &PaymentMethod,
) -> WriteVerification {
    let payments = match backend.list_payments(sale_id).await {
        Ok(payments) => payments,
        Err(err) => {
            warn!(sale_id = %sale_id, error = %err, "Payment read-back failed");
            return WriteVerification::Inconclusive(err.to_string());
        }
    };

    let found = payments
        .iter()
        .any(|p| &p.method == method && p.amount.matches(expected));

    debug!(
        sale_id = %sale_id,
        method = %method,
        expected = %expected,
        payments = payments.len(),
        found,
        "Payment read-back complete"
    );

    if found {
        WriteVerification::Confirmed
    } else {
        WriteVerification::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{payment, FakeBackend};

    #[tokio::test]
    async fn test_confirmed_within_tolerance() {
        let backend = FakeBackend::new().with_payment(payment("77", PaymentMethod::Cash, 99_999));

        let result = verify_write(
            &backend,
            &SaleId::from("77"),
            Money::from_cents(100_000),
            &PaymentMethod::Cash,
        )
        .await;

        assert_eq!(result, WriteVerification::Confirmed);
        assert_eq!(backend.calls().list_payments, 1);
        assert_eq!(backend.calls().create_payment, 0);
    }

    #[tokio::test]
    async fn test_wrong_method_or_amount_is_not_found() {
        let backend = FakeBackend::new()
            .with_payment(payment("77", PaymentMethod::Credit, 100_000))
            .with_payment(payment("77", PaymentMethod::Cash, 99_998));

        let result = verify_write(
            &backend,
            &SaleId::from("77"),
            Money::from_cents(100_000),
            &PaymentMethod::Cash,
        )
        .await;

        assert_eq!(result, WriteVerification::NotFound);
    }

    #[tokio::test]
    async fn test_failed_read_is_inconclusive() {
        let backend = FakeBackend::new().failing_payment_reads();

        let result = verify_write(
            &backend,
            &SaleId::from("77"),
            Money::from_cents(100_000),
            &PaymentMethod::Cash,
        )
        .await;

        assert!(matches!(result, WriteVerification::Inconclusive(_)));
    }

    #[tokio::test]
    async fn test_repeatable() {
        let backend = FakeBackend::new().with_payment(payment("77", PaymentMethod::Cash, 100_000));
        let sale_id = SaleId::from("77");

        for _ in 0..3 {
            let result =
                verify_write(&backend, &sale_id, Money::from_cents(100_000), &PaymentMethod::Cash)
                    .await;
            assert!(result.is_confirmed());
        }
        assert_eq!(backend.calls().create_payment, 0);
    }
}
