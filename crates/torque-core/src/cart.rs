//! # Cart Model
//!
//! The lines a cashier is about to sell, with the shop's pricing rules
//! enforced on every edit.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action          Method                 Cart Change             │
//! │  ──────────────          ──────                 ───────────             │
//! │                                                                         │
//! │  Pick Part ─────────────► add_line() ──────────► push or merge qty      │
//! │                                                                         │
//! │  Edit Price ────────────► set_unit_price() ────► price ≥ floor or Err   │
//! │                                                                         │
//! │  Edit Quantity ─────────► set_quantity() ──────► 1 ≤ qty ≤ 999 or Err   │
//! │                                                                         │
//! │  Click Remove ──────────► remove_line() ───────► line dropped           │
//! │                                                                         │
//! │  Checkout OK / Clear ───► clear() ─────────────► empty                  │
//! │                                                                         │
//! │  Every mutation recomputes line_total from unit_price × quantity and    │
//! │  is rejected, leaving the cart unchanged, if a total would overflow.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ProductRef;
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

/// One editable quantity + price entry for a product.
///
/// ## Invariants
/// - `unit_price >= floor_price`
/// - `1 <= quantity <= MAX_ITEM_QUANTITY`
/// - `line_total == unit_price × quantity`
///
/// Fields are private so the invariants can only be changed through
/// [`Cart`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    product_id: String,
    product_name: String,
    unit_price: Money,
    floor_price: Money,
    quantity: i64,
    line_total: Money,
}

impl CartLine {
    fn new(
        product: &ProductRef,
        floor_price: Money,
        unit_price: Money,
        quantity: i64,
    ) -> CoreResult<Self> {
        let unit_price = unit_price.max(floor_price);
        let quantity = checked_quantity(&product.id, quantity)?;

        Ok(CartLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price,
            floor_price,
            quantity,
            line_total: line_total(&product.id, unit_price, quantity)?,
        })
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn floor_price(&self) -> Money {
        self.floor_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same part merges quantity)
/// - At most [`MAX_CART_LINES`] distinct lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product, or merges into the existing line for it.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increases by `quantity`; the
    ///   line keeps its current price and floor
    /// - New product: a line is appended with `unit_price` raised to
    ///   `floor_price` if it was below
    /// - `quantity` below 1 counts as 1
    /// - A resulting quantity above [`MAX_ITEM_QUANTITY`] is rejected
    pub fn add_line(
        &mut self,
        product: &ProductRef,
        floor_price: Money,
        unit_price: Money,
        quantity: i64,
    ) -> CoreResult<()> {
        let quantity = quantity.max(1);

        if let Some((price, current)) = self.line(&product.id).map(|l| (l.unit_price, l.quantity)) {
            let merged = checked_quantity(&product.id, current.saturating_add(quantity))?;
            return self.update_line(&product.id, price, merged);
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let line = CartLine::new(product, floor_price, unit_price, quantity)?;
        self.checked_total(&line.product_id, line.line_total)?;
        self.lines.push(line);
        Ok(())
    }

    /// Changes the unit price of a line.
    ///
    /// A price below the line's floor is rejected and the previous price
    /// stays in place.
    pub fn set_unit_price(&mut self, product_id: &str, price: Money) -> CoreResult<()> {
        let line = self.existing_line(product_id)?;

        if price < line.floor_price {
            return Err(CoreError::PriceBelowFloor {
                product_id: product_id.to_string(),
                requested: price,
                floor: line.floor_price,
            });
        }

        self.update_line(product_id, price, line.quantity)
    }

    /// Sets a line's quantity, clamping anything below 1 up to 1.
    ///
    /// A quantity above [`MAX_ITEM_QUANTITY`] is rejected and the previous
    /// quantity stays in place.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        let line = self.existing_line(product_id)?;
        let quantity = checked_quantity(product_id, quantity)?;
        self.update_line(product_id, line.unit_price, quantity)
    }

    /// Removes the line for a product.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::LineNotFound(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line totals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Returns the number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Summary for the register display.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    fn existing_line(&self, product_id: &str) -> CoreResult<CartLine> {
        self.line(product_id)
            .cloned()
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))
    }

    /// Applies a new price and quantity to a line once both its total and
    /// the cart total are known to fit.
    fn update_line(&mut self, product_id: &str, unit_price: Money, quantity: i64) -> CoreResult<()> {
        let total = line_total(product_id, unit_price, quantity)?;
        self.checked_total(product_id, total)?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;
        line.unit_price = unit_price;
        line.quantity = quantity;
        line.line_total = total;
        Ok(())
    }

    /// Cart total with `product_id`'s line replaced by `line_total`.
    fn checked_total(&self, product_id: &str, line_total: Money) -> CoreResult<Money> {
        self.lines
            .iter()
            .filter(|l| l.product_id != product_id)
            .try_fold(line_total, |total, l| total.checked_add(l.line_total))
            .ok_or_else(|| CoreError::AmountOutOfRange {
                product_id: product_id.to_string(),
            })
    }
}

fn checked_quantity(product_id: &str, quantity: i64) -> CoreResult<i64> {
    let quantity = quantity.max(1);
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            product_id: product_id.to_string(),
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(quantity)
}

fn line_total(product_id: &str, unit_price: Money, quantity: i64) -> CoreResult<Money> {
    unit_price
        .multiply_quantity(quantity)
        .ok_or_else(|| CoreError::AmountOutOfRange {
            product_id: product_id.to_string(),
        })
}

/// Cart totals summary for the register display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}
