//! # Credit Payment Updater
//!
//! Records a cash settlement against a sale that was sold on credit.
//!
//! Unlike checkout there is no read-back: the operator triggers this by
//! hand, sees the result, and can check the sale and retry. The payment
//! response is taken at its word.

use std::sync::Arc;

use serde::Serialize;
use torque_core::validation::{validate_email, validate_payment_amount};
use torque_core::{Classification, Money, PaymentMethod, SaleId, SaleState};
use torque_remote::{CreatePaymentRequest, SalesBackend};
use tracing::{info, warn};

use crate::book::{BookEntry, SaleBook};
use crate::error::SettlementError;
use crate::orchestrator::payment_reference;

/// Result of a recorded settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub sale_id: SaleId,
    pub amount: Money,
    pub reference: String,
    /// Classification after re-reading the sale; `None` if the re-read failed.
    pub classification: Option<Classification>,
    /// State held in the sale book once the settlement was recorded.
    pub state: SaleState,
}

impl Settlement {
    pub fn message(&self) -> String {
        match self.state {
            SaleState::CreditSettled => format!(
                "Payment of {} recorded. Sale ID: {} is now fully paid.",
                self.amount, self.sale_id
            ),
            _ => format!(
                "Payment of {} recorded. Sale ID: {} still has a balance.",
                self.amount, self.sale_id
            ),
        }
    }
}

/// Settles open credit sales held in a [`SaleBook`].
#[derive(Clone)]
pub struct CreditPaymentUpdater {
    backend: Arc<dyn SalesBackend>,
    book: SaleBook,
}

impl CreditPaymentUpdater {
    pub fn new(backend: Arc<dyn SalesBackend>, book: SaleBook) -> Self {
        CreditPaymentUpdater { backend, book }
    }

    /// Pays `amount` (default: the outstanding balance) toward a credit sale.
    pub async fn settle(
        &self,
        sale_id: &SaleId,
        amount: Option<Money>,
        receipt_email: Option<&str>,
    ) -> Result<Settlement, SettlementError> {
        let entry = self
            .book
            .get(sale_id)
            .await
            .ok_or_else(|| SettlementError::UnknownSale(sale_id.clone()))?;

        if entry.classification != Classification::Credit {
            return Err(SettlementError::NotCredit(sale_id.clone()));
        }

        let outstanding = entry.outstanding();
        if outstanding.is_zero() {
            return Err(SettlementError::NothingOutstanding(sale_id.clone()));
        }

        let amount = amount.unwrap_or(outstanding);
        validate_payment_amount(amount)?;
        let email = receipt_email.map(validate_email).transpose()?;

        if amount > outstanding {
            warn!(
                sale_id = %sale_id,
                amount = %amount,
                outstanding = %outstanding,
                "Settlement exceeds outstanding balance"
            );
        }

        let request = CreatePaymentRequest {
            sale_id: sale_id.clone(),
            payment_method: PaymentMethod::Cash,
            amount,
            reference: payment_reference(&PaymentMethod::Cash),
            email,
        };

        self.backend.create_payment(&request).await.map_err(|err| {
            warn!(sale_id = %sale_id, error = %err, "Settlement payment failed");
            SettlementError::Remote(err)
        })?;

        info!(
            sale_id = %sale_id,
            amount = %amount,
            reference = %request.reference,
            "Settlement recorded"
        );

        let refreshed = self.refresh(sale_id).await;

        Ok(Settlement {
            sale_id: request.sale_id,
            amount,
            reference: request.reference,
            classification: refreshed.as_ref().map(|e| e.classification),
            state: refreshed.map_or(entry.state, |e| e.state),
        })
    }

    async fn refresh(&self, sale_id: &SaleId) -> Option<BookEntry> {
        let sale = self.backend.get_sale(sale_id).await;
        let payments = self.backend.list_payments(sale_id).await;

        match (sale, payments) {
            (Ok(sale), Ok(payments)) => Some(self.book.record(sale, payments).await),
            (Err(err), _) | (_, Err(err)) => {
                warn!(sale_id = %sale_id, error = %err, "Could not refresh settled sale");
                None
            }
        }
    }
}
