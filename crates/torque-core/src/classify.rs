//! # Sale Classifier
//!
//! Buckets a sale into Paid or Credit for the register views.
//!
//! ## Two-Tier Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale { payment_status, total_amount } + known payments                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Tier 1: normalized status token                                        │
//! │  ├── paid | completed | cash ─────────────────────────────► Paid        │
//! │  ├── pending | credit | partial | partially paid | unpaid ► Credit      │
//! │  └── anything else (or blank)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Tier 2: Σ settlement payments vs total_amount                          │
//! │  ├── within 0.01 ─────────────────────────────────────────► Paid        │
//! │  └── otherwise ───────────────────────────────────────────► Credit      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend's status vocabulary drifts between releases; an unknown
//! status is never an error, it just falls through to the arithmetic.
//!
//! CREDIT payments record what the customer owes, not money received, so
//! tier 2 leaves them out of the sum.

use crate::money::Money;
use crate::types::{Classification, Payment, Sale};

const PAID_TOKENS: &[&str] = &["paid", "completed", "cash"];
const CREDIT_TOKENS: &[&str] = &["pending", "credit", "partial", "partially paid", "unpaid"];

/// Normalizes a status string: lower case, `_` and `-` read as spaces,
/// runs of whitespace collapsed.
///
/// ## Example
/// ```rust
/// use torque_core::classify::normalize_status;
///
/// assert_eq!(normalize_status("  PARTIALLY_PAID "), "partially paid");
/// assert_eq!(normalize_status("Partially-Paid"), "partially paid");
/// ```
pub fn normalize_status(status: &str) -> String {
    status
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tier 1 only: the classification implied by a status string, if any.
pub fn classify_status(status: &str) -> Option<Classification> {
    let token = normalize_status(status);

    if PAID_TOKENS.contains(&token.as_str()) {
        Some(Classification::Paid)
    } else if CREDIT_TOKENS.contains(&token.as_str()) {
        Some(Classification::Credit)
    } else {
        None
    }
}

/// Sum of the payments that represent money received.
pub fn settled_amount(payments: &[Payment]) -> Money {
    payments
        .iter()
        .filter(|p| p.method.is_settlement())
        .map(|p| p.amount)
        .sum()
}

/// What is still owed on a sale, never negative.
pub fn outstanding_balance(sale: &Sale, payments: &[Payment]) -> Money {
    sale.total_amount
        .saturating_remaining(settled_amount(payments))
}

/// Classifies a sale using its status, falling back to its payments.
///
/// ## Example
/// ```rust,ignore
/// let class = classify(&sale, &payments);
/// match class {
///     Classification::Paid => paid_view.push(sale),
///     Classification::Credit => credit_view.push(sale),
/// }
/// ```
pub fn classify(sale: &Sale, payments: &[Payment]) -> Classification {
    if let Some(class) = classify_status(&sale.payment_status) {
        return class;
    }

    if settled_amount(payments).matches(sale.total_amount) {
        Classification::Paid
    } else {
        Classification::Credit
    }
}
