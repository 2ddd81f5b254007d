//! # torque-core: Pure Business Logic for Torque POS
//!
//! The rules a parts counter lives by, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Torque POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Register front-end (apps/register)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        torque-checkout (orchestrator, verifier, settlement)     │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────────┐  ┌────────────▼───────────────┐   │
//! │  │  ★ torque-core (THIS CRATE) ★   │  │  torque-remote (REST)      │   │
//! │  │                                 │  │                            │   │
//! │  │  money · cart · classify ·      │  │  envelopes · wire types ·  │   │
//! │  │  validation · types             │  │  HTTP backend              │   │
//! │  │                                 │  │                            │   │
//! │  │  NO I/O • NO NETWORK            │  └────────────────────────────┘   │
//! │  └─────────────────────────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer cents
//! - [`cart`] - Cart lines with floor-price and quantity invariants
//! - [`classify`] - Paid / Credit classification of sales
//! - [`types`] - Domain types (Sale, Payment, SaleState, ...)
//! - [`validation`] - Checkout input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use torque_core::{Cart, Money, ProductRef};
//!
//! let mut cart = Cart::new();
//! let pads = ProductRef::new("BRK-01", "Brake pads (front)");
//!
//! cart.add_line(&pads, Money::from_cents(40_000), Money::from_cents(50_000), 2)
//!     .unwrap();
//! assert_eq!(cart.total(), Money::from_cents(100_000));
//!
//! // Below the floor: rejected, price unchanged
//! assert!(cart.set_unit_price("BRK-01", Money::from_cents(39_000)).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod classify;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals};
pub use classify::classify;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Keeps sale requests to a size the backend accepts in one call.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single cart line.
///
/// ## Business Reason
/// Catches typos (an extra zero or two) before they reach the backend.
pub const MAX_ITEM_QUANTITY: i64 = 999;
