//! # Domain Types
//!
//! Core domain types used throughout Torque POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │    Payment      │   │ Classification  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (SaleId)    │   │  id             │   │  Paid           │       │
//! │  │  number         │   │  sale_id        │   │  Credit         │       │
//! │  │  total_amount   │   │  method         │   └─────────────────┘       │
//! │  │  payment_status │   │  amount         │                              │
//! │  └─────────────────┘   └─────────────────┘   ┌─────────────────┐       │
//! │                                              │   SaleState     │       │
//! │  Sale and Payment are owned by the remote    │  New → Submitted│       │
//! │  service. The register only holds copies.    │  → Paid         │       │
//! │                                              │  → CreditOpen   │       │
//! │                                              │  → CreditSettled│       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a sale as assigned by the backend.
///
/// The backend hands out numeric ids on some endpoints and strings on
/// others; both are normalized to their decimal/string form here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct SaleId(String);

impl SaleId {
    /// Wraps an id, trimming surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Self {
        let id: String = id.into();
        SaleId(id.trim().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SaleId {
    fn from(id: &str) -> Self {
        SaleId::new(id)
    }
}

impl From<String> for SaleId {
    fn from(id: String) -> Self {
        SaleId::new(id)
    }
}

impl From<i64> for SaleId {
    fn from(id: i64) -> Self {
        SaleId(id.to_string())
    }
}

/// The product half of a cart line: what is being sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    /// Backend product identifier.
    pub id: String,
    /// Display name shown to the cashier.
    pub name: String,
}

impl ProductRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        ProductRef {
            id: id.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a payment was (or will be) made.
///
/// The register only ever writes `Cash` and `Credit`. Payment lists read
/// back from the backend can contain other tender types (mobile money,
/// cards); those are kept as `Other` instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    /// Money received at the counter.
    Cash,
    /// An obligation: the customer owes the amount.
    Credit,
    /// Any tender the register does not create itself.
    Other(String),
}

impl PaymentMethod {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Credit => "CREDIT",
            PaymentMethod::Other(raw) => raw,
        }
    }

    /// True for tenders that represent money actually received.
    pub fn is_settlement(&self) -> bool {
        !matches!(self, PaymentMethod::Credit)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s.trim().to_ascii_uppercase().as_str() {
            "CASH" => PaymentMethod::Cash,
            "CREDIT" => PaymentMethod::Credit,
            _ => PaymentMethod::Other(s.trim().to_string()),
        };
        Ok(method)
    }
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        match raw.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.as_str().to_string()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale as last read from the backend.
///
/// The register never mutates a sale; it submits creation requests and
/// re-reads the authoritative record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    /// Human-facing sale number, when the backend assigns one.
    pub number: Option<String>,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub total_amount: Money,
    /// Free-text status; see [`crate::classify`].
    pub payment_status: String,
    pub items: Vec<SaleItem>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A line of a recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub discount: Money,
}

// =============================================================================
// Payment
// =============================================================================

/// A payment recorded against a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Option<String>,
    pub sale_id: Option<SaleId>,
    pub method: PaymentMethod,
    pub amount: Money,
    /// Reference token sent with the write (used for reconciliation).
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Classification
// =============================================================================

/// Display bucket for a sale. Derived, never stored as ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Fully settled.
    Paid,
    /// Money is still owed.
    Credit,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Paid => write!(f, "Paid"),
            Classification::Credit => write!(f, "Credit"),
        }
    }
}

// =============================================================================
// Sale State
// =============================================================================

/// Client-side perception of where a sale is in its life.
///
/// ## Transitions (forward only)
/// ```text
/// New ──► Submitted ──┬──► Paid
///                     │
///                     └──► CreditOpen ──► CreditSettled
/// ```
///
/// No cancellation or rollback is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleState {
    /// Still in the cart.
    New,
    /// Sale created remotely, no payment outcome yet.
    Submitted,
    /// Settled at checkout.
    Paid,
    /// Sold on credit; money still owed.
    CreditOpen,
    /// Credit sale settled afterwards.
    CreditSettled,
}

impl SaleState {
    /// True when `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: SaleState) -> bool {
        matches!(
            (self, next),
            (SaleState::New, SaleState::Submitted)
                | (SaleState::Submitted, SaleState::Paid)
                | (SaleState::Submitted, SaleState::CreditOpen)
                | (SaleState::CreditOpen, SaleState::CreditSettled)
        )
    }

    /// Moves to `next`, rejecting anything but a forward transition.
    pub fn advance(self, next: SaleState) -> CoreResult<SaleState> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl From<Classification> for SaleState {
    /// Maps a classification of a recorded sale to its state.
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::Paid => SaleState::Paid,
            Classification::Credit => SaleState::CreditOpen,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
