//! # Checkout Orchestrator
//!
//! Turns a cart into a recorded sale and its payment.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ 1. gate + validate     ── fail ──► CheckoutError (no network)           │
//! │ 2. create sale         ── fail ──► CheckoutError::SaleCreation          │
//! │                                    (cart kept, safe to retry)           │
//! │    ─────────── sale exists from here on; cart is cleared ───────────    │
//! │ 3. sale id?            ── none ──► SaleRecordedWithoutId                │
//! │ 4. CASH   payment      ── ok ────► Paid                                 │
//! │                        ── fail ──► verify_write ── Confirmed ─► Paid    │
//! │                                                 └─ otherwise ─► Partial │
//! │ 5. CREDIT payment      ── any ───► CreditOpen (failure only logged)     │
//! │ 6. re-fetch sale + payments into the sale book (failure only logged)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes are never retried and the sale is never rolled back. An
//! uncertain payment write gets exactly one read-back.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use torque_core::validation::{validate_cart, validate_phone, validate_receipt};
use torque_core::{Cart, Money, PaymentMethod, SaleId, SaleState};
use torque_remote::{CreatePaymentRequest, CreateSaleRequest, SalesBackend};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::book::SaleBook;
use crate::error::CheckoutError;
use crate::gate::CheckoutGate;
use crate::verify::{verify_write, WriteVerification};

// =============================================================================
// Request
// =============================================================================

/// Tender chosen at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutMethod {
    Cash,
    Credit,
}

impl CheckoutMethod {
    pub fn payment_method(self) -> PaymentMethod {
        match self {
            CheckoutMethod::Cash => PaymentMethod::Cash,
            CheckoutMethod::Credit => PaymentMethod::Credit,
        }
    }
}

impl fmt::Display for CheckoutMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payment_method())
    }
}

/// Operator inputs for one checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub method: CheckoutMethod,
    pub receipt_requested: bool,
    pub receipt_email: Option<String>,
}

impl CheckoutRequest {
    pub fn new(customer_phone: impl Into<String>, method: CheckoutMethod) -> Self {
        CheckoutRequest {
            customer_phone: customer_phone.into(),
            customer_name: None,
            method,
            receipt_requested: false,
            receipt_email: None,
        }
    }

    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_receipt(mut self, email: impl Into<String>) -> Self {
        self.receipt_requested = true;
        self.receipt_email = Some(email.into());
        self
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// How a checkout ended once the sale existed remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    /// Sale and CASH payment recorded.
    Paid {
        sale_id: SaleId,
        amount: Money,
        /// True when the payment response was lost and read-back confirmed it.
        reconciled: bool,
    },

    /// Sold on credit.
    CreditOpen {
        sale_id: SaleId,
        amount: Money,
        /// False when the CREDIT payment write failed.
        obligation_recorded: bool,
    },

    /// Sale recorded, CASH payment not confirmed. Needs manual follow-up.
    PartialFailure {
        sale_id: SaleId,
        amount: Money,
        verification: WriteVerification,
    },

    /// Backend accepted the sale without returning its id; no payment was attempted.
    SaleRecordedWithoutId { total: Money },
}

impl CheckoutOutcome {
    pub fn sale_id(&self) -> Option<&SaleId> {
        match self {
            CheckoutOutcome::Paid { sale_id, .. }
            | CheckoutOutcome::CreditOpen { sale_id, .. }
            | CheckoutOutcome::PartialFailure { sale_id, .. } => Some(sale_id),
            CheckoutOutcome::SaleRecordedWithoutId { .. } => None,
        }
    }

    /// Client-side state of the sale after this outcome.
    pub fn state(&self) -> SaleState {
        match self {
            CheckoutOutcome::Paid { .. } => SaleState::Paid,
            CheckoutOutcome::CreditOpen { .. } => SaleState::CreditOpen,
            CheckoutOutcome::PartialFailure { .. }
            | CheckoutOutcome::SaleRecordedWithoutId { .. } => SaleState::Submitted,
        }
    }

    /// True when the operator has to follow up by hand.
    pub fn needs_attention(&self) -> bool {
        matches!(
            self,
            CheckoutOutcome::PartialFailure { .. } | CheckoutOutcome::SaleRecordedWithoutId { .. }
        )
    }

    /// Operator-facing message.
    pub fn message(&self) -> String {
        match self {
            CheckoutOutcome::Paid {
                sale_id,
                amount,
                reconciled: false,
            } => format!("Sale completed. Sale ID: {sale_id}. Paid {amount} cash."),
            CheckoutOutcome::Paid {
                sale_id,
                amount,
                reconciled: true,
            } => format!(
                "Sale completed. Sale ID: {sale_id}. Cash payment of {amount} confirmed after a connection problem."
            ),
            CheckoutOutcome::CreditOpen {
                sale_id, amount, ..
            } => format!("Credit sale recorded. Sale ID: {sale_id}. Amount owed: {amount}."),
            CheckoutOutcome::PartialFailure {
                sale_id,
                amount,
                verification,
            } => {
                let detail = match verification {
                    WriteVerification::NotFound => "no payment was found for it".to_string(),
                    WriteVerification::Inconclusive(reason) => {
                        format!("its payments could not be checked ({reason})")
                    }
                    WriteVerification::Confirmed => "the payment was confirmed".to_string(),
                };
                format!(
                    "Sale recorded but the cash payment of {amount} was not confirmed: {detail}. \
                     Sale ID: {sale_id}. Record the payment manually."
                )
            }
            CheckoutOutcome::SaleRecordedWithoutId { total } => format!(
                "Sale of {total} recorded, payment not attempted: the server did not return a sale ID. \
                 Check the sales list before taking payment."
            ),
        }
    }
}

/// Reference token attached to a payment write: `CASH-260314093000-1a2b3c4d`.
pub(crate) fn payment_reference(method: &PaymentMethod) -> String {
    let nonce = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        method,
        Utc::now().format("%y%m%d%H%M%S"),
        &nonce[..8]
    )
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Runs checkouts for one register.
#[derive(Clone)]
pub struct Checkout {
    backend: Arc<dyn SalesBackend>,
    book: SaleBook,
    gate: CheckoutGate,
}

impl Checkout {
    pub fn new(backend: Arc<dyn SalesBackend>, book: SaleBook) -> Self {
        Checkout {
            backend,
            book,
            gate: CheckoutGate::new(),
        }
    }

    pub fn book(&self) -> &SaleBook {
        &self.book
    }

    pub fn gate(&self) -> &CheckoutGate {
        &self.gate
    }

    /// Checks out `cart`.
    ///
    /// Returns `Err` only when no sale was created; the cart is then left
    /// as it was. Every `Ok` outcome means the sale exists remotely and the
    /// cart has been cleared.
    pub async fn run(
        &self,
        cart: &mut Cart,
        request: &CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let _permit = self.gate.try_acquire()?;

        validate_cart(cart)?;
        let phone = validate_phone(&request.customer_phone)?;
        let email = validate_receipt(request.receipt_requested, request.receipt_email.as_deref())?;

        let cart_total = cart.total();
        let sale_request = CreateSaleRequest::from_cart(cart, &phone, request.customer_name.as_deref());

        let created = self
            .backend
            .create_sale(&sale_request)
            .await
            .map_err(|err| {
                warn!(error = %err, transport = err.is_transport(), "Sale creation failed");
                CheckoutError::SaleCreation(err)
            })?;

        cart.clear();

        let Some(sale_id) = created.id else {
            let total = created.total.unwrap_or(cart_total);
            warn!(total = %total, "Sale created without an id; payment not attempted");
            return Ok(CheckoutOutcome::SaleRecordedWithoutId { total });
        };

        let authoritative = created.total.unwrap_or_else(|| {
            debug!(sale_id = %sale_id, "No total in sale response, using cart total");
            cart_total
        });
        if !authoritative.matches(cart_total) {
            warn!(
                sale_id = %sale_id,
                cart_total = %cart_total,
                authoritative = %authoritative,
                "Server total differs from cart total"
            );
        }
        let amount = authoritative.max(cart_total);

        info!(
            sale_id = %sale_id,
            amount = %amount,
            method = %request.method,
            lines = sale_request.items.len(),
            "Sale created"
        );

        let outcome = match request.method {
            CheckoutMethod::Cash => self.take_cash(sale_id, amount, email).await,
            CheckoutMethod::Credit => self.open_credit(sale_id, amount, email).await,
        };

        if let Some(sale_id) = outcome.sale_id() {
            self.refresh(sale_id).await;
        }

        info!(
            sale_id = ?outcome.sale_id().map(SaleId::as_str),
            state = ?outcome.state(),
            "Checkout finished"
        );
        Ok(outcome)
    }

    async fn take_cash(&self, sale_id: SaleId, amount: Money, email: Option<String>) -> CheckoutOutcome {
        let request = CreatePaymentRequest {
            sale_id,
            payment_method: PaymentMethod::Cash,
            amount,
            reference: payment_reference(&PaymentMethod::Cash),
            email,
        };

        let err = match self.backend.create_payment(&request).await {
            Ok(()) => {
                return CheckoutOutcome::Paid {
                    sale_id: request.sale_id,
                    amount,
                    reconciled: false,
                }
            }
            Err(err) => err,
        };

        warn!(
            sale_id = %request.sale_id,
            reference = %request.reference,
            error = %err,
            "Cash payment outcome uncertain, reading back"
        );

        let verification =
            verify_write(self.backend.as_ref(), &request.sale_id, amount, &PaymentMethod::Cash).await;

        if verification.is_confirmed() {
            info!(sale_id = %request.sale_id, "Cash payment confirmed by read-back");
            CheckoutOutcome::Paid {
                sale_id: request.sale_id,
                amount,
                reconciled: true,
            }
        } else {
            warn!(
                sale_id = %request.sale_id,
                verification = ?verification,
                "Cash payment not confirmed; sale needs manual follow-up"
            );
            CheckoutOutcome::PartialFailure {
                sale_id: request.sale_id,
                amount,
                verification,
            }
        }
    }

    async fn open_credit(&self, sale_id: SaleId, amount: Money, email: Option<String>) -> CheckoutOutcome {
        let request = CreatePaymentRequest {
            sale_id,
            payment_method: PaymentMethod::Credit,
            amount,
            reference: payment_reference(&PaymentMethod::Credit),
            email,
        };

        let obligation_recorded = match self.backend.create_payment(&request).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    sale_id = %request.sale_id,
                    reference = %request.reference,
                    error = %err,
                    "Credit obligation not recorded"
                );
                false
            }
        };

        CheckoutOutcome::CreditOpen {
            sale_id: request.sale_id,
            amount,
            obligation_recorded,
        }
    }

    /// Re-reads a sale and its payments into the book.
    ///
    /// The book is only touched when both reads succeed; classifying a sale
    /// against a partial payment list could file a paid sale as credit.
    async fn refresh(&self, sale_id: &SaleId) {
        let sale = match self.backend.get_sale(sale_id).await {
            Ok(sale) => sale,
            Err(err) => {
                warn!(sale_id = %sale_id, error = %err, "Could not refresh sale");
                return;
            }
        };

        let payments = match self.backend.list_payments(sale_id).await {
            Ok(payments) => payments,
            Err(err) => {
                warn!(sale_id = %sale_id, error = %err, "Could not refresh payments");
                return;
            }
        };

        self.book.record(sale, payments).await;
    }
}
