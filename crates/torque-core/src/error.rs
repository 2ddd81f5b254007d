//! # Error Types
//!
//! Domain-specific error types for torque-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  torque-core errors (this file)                                        │
//! │  ├── CoreError        - Cart and sale-state rule violations            │
//! │  └── ValidationError  - Checkout input failures (no network call)      │
//! │                                                                         │
//! │  torque-remote errors (separate crate)                                 │
//! │  └── RemoteError      - HTTP, envelope and decoding failures           │
//! │                                                                         │
//! │  torque-checkout errors                                                │
//! │  └── CheckoutError / SettlementError - what the operator sees          │
//! │                                                                         │
//! │  Flow: ValidationError → CheckoutError → Operator message              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;
use crate::types::SaleState;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A price edit went below the line's floor price.
    ///
    /// ## User Workflow
    /// ```text
    /// Cashier types 350.00 for a part with floor 400.00
    ///      │
    ///      ▼
    /// PriceBelowFloor { product_id, requested: 350.00, floor: 400.00 }
    ///      │
    ///      ▼
    /// Price cell reverts to the previous value
    /// ```
    #[error("Price {requested} for {product_id} is below the floor price {floor}")]
    PriceBelowFloor {
        product_id: String,
        requested: Money,
        floor: Money,
    },

    /// No cart line exists for the product.
    #[error("Product {0} is not in the cart")]
    LineNotFound(String),

    /// Cart has reached the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// A line's quantity would exceed the per-line maximum.
    #[error("Quantity {requested} for {product_id} exceeds the maximum of {max}")]
    QuantityTooLarge {
        product_id: String,
        requested: i64,
        max: i64,
    },

    /// A line or cart total no longer fits in the money range.
    #[error("Amount for {product_id} is out of range")]
    AmountOutOfRange { product_id: String },

    /// A sale was asked to move backwards (or sideways) in its lifecycle.
    #[error("Sale cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: SaleState, to: SaleState },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
