//! # Cart Aggregate
//!
//! The in-memory, pre-checkout collection of product lines and pricing
//! modifiers for one sale. The aggregate owns every mutation and enforces
//! the line invariants at a single point, independent of caller discipline.
//!
//! ## Invariants
//! - Exactly one line per product id; re-adding a product merges into the
//!   existing line instead of duplicating it.
//! - Lines keep their scan order.
//! - `1 <= quantity <= available_quantity` for every line. Quantity writes
//!   are clamped here, not in the UI.
//! - Line count never exceeds [`crate::MAX_CART_LINES`].
//!
//! ## Lifecycle
//! ```text
//! ┌─────────┐  add_or_merge   ┌───────────┐  clear() / checkout  ┌─────────┐
//! │  Empty  │ ───────────────►│ Populated │ ────────────────────►│  Empty  │
//! └─────────┘                 └───────────┘                      └─────────┘
//!                             set_quantity, remove_line,
//!                             discount/tax/customer setters
//! ```
//!
//! The cart is ephemeral client-side state. The durable record of a sale is
//! the invoice created at checkout, owned by the invoicing service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Percent};
use crate::types::ProductSnapshot;
use crate::MAX_CART_LINES;

// =============================================================================
// Cart Line
// =============================================================================

/// One product line within a cart.
///
/// Price and stock are frozen from the [`ProductSnapshot`] that created the
/// line; later scans of the same product only bump the quantity, so a
/// mid-sale price change in the catalog cannot split a sale across two
/// prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Catalog identifier, unique within the cart.
    pub product_id: String,

    /// Name at scan time (frozen).
    pub name: String,

    /// SKU at scan time (frozen).
    pub sku: String,

    /// Barcode at scan time (frozen).
    pub barcode: Option<String>,

    /// Units of this product in the cart.
    pub quantity: i64,

    /// Unit price at scan time (frozen).
    pub unit_price: Money,

    /// Cost price at scan time, for margin reporting.
    pub cost_price: Money,

    /// Per-line discount rate. Applied to the line gross.
    pub discount_percent: Percent,

    /// Per-line flat discount. Applied in addition to the rate; the two
    /// line-level fields are additive, unlike the cart-level pair.
    pub discount_amount: Money,

    /// Stock on hand at scan time. The quantity ceiling for this line; not
    /// re-validated against live stock after the line is created.
    pub available_quantity: i64,

    /// When the line entered the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a line with quantity 1 from a catalog snapshot.
    pub fn from_snapshot(snapshot: &ProductSnapshot) -> Self {
        CartLine {
            product_id: snapshot.id.clone(),
            name: snapshot.name.clone(),
            sku: snapshot.sku.clone(),
            barcode: snapshot.barcode.clone(),
            quantity: 1,
            unit_price: snapshot.selling_price,
            cost_price: snapshot.cost_price,
            discount_percent: Percent::zero(),
            discount_amount: Money::zero(),
            available_quantity: snapshot.stock_quantity,
            added_at: Utc::now(),
        }
    }

    /// Line gross: unit price x quantity, before discounts.
    pub fn gross(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Total line discount: flat amount plus rate share of the gross.
    pub fn discount(&self) -> Money {
        self.discount_amount + self.gross().percent_of(self.discount_percent)
    }

    /// Line total: gross minus discount.
    pub fn line_total(&self) -> Money {
        self.gross() - self.discount()
    }
}

// =============================================================================
// Add Outcome
// =============================================================================

/// Whether an add created a new line or merged into an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddKind {
    /// First scan of this product: a new line was appended.
    Added,
    /// Repeat scan: the existing line's quantity was incremented.
    Merged,
}

/// Result of [`Cart::add_or_merge`], carrying the line as stored for UI
/// feedback ("added" vs "added another").
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOutcome {
    pub kind: AddKind,
    pub line: CartLine,
}

// =============================================================================
// Cart
// =============================================================================

/// The cart aggregate: ordered lines plus cart-level pricing modifiers.
///
/// Constructed explicitly and passed explicitly; a process can hold any
/// number of independent carts (one per terminal).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
    customer_name: String,
    customer_phone: Option<String>,
    /// Cart-level discount rate; wins over the flat amount when non-zero.
    discount_percent: Percent,
    /// Cart-level flat discount; ignored while `discount_percent` is set.
    discount_amount: Money,
    tax_percent: Percent,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            customer_name: String::new(),
            customer_phone: None,
            discount_percent: Percent::zero(),
            discount_amount: Money::zero(),
            tax_percent: Percent::zero(),
            created_at: Utc::now(),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product to the cart, merging by product id.
    ///
    /// A repeat scan increments the existing line's quantity by 1 and keeps
    /// the line's frozen price and stock snapshot; the new snapshot's values
    /// are ignored so the sale cannot drift mid-cart. A first scan appends a
    /// new line with quantity 1.
    ///
    /// Errors when the increment would pass the line's stock snapshot, when
    /// the snapshot has no stock at all, or when the cart is at its line
    /// ceiling.
    pub fn add_or_merge(&mut self, snapshot: &ProductSnapshot) -> CoreResult<AddOutcome> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == snapshot.id) {
            let requested = line.quantity + 1;
            if requested > line.available_quantity {
                return Err(CoreError::InsufficientStock {
                    sku: line.sku.clone(),
                    available: line.available_quantity,
                    requested,
                });
            }
            line.quantity = requested;
            return Ok(AddOutcome {
                kind: AddKind::Merged,
                line: line.clone(),
            });
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        if snapshot.stock_quantity < 1 {
            return Err(CoreError::InsufficientStock {
                sku: snapshot.sku.clone(),
                available: snapshot.stock_quantity,
                requested: 1,
            });
        }

        let line = CartLine::from_snapshot(snapshot);
        self.lines.push(line.clone());
        Ok(AddOutcome {
            kind: AddKind::Added,
            line,
        })
    }

    /// Sets a line's quantity, clamped to `[1, available_quantity]`.
    ///
    /// Returns the quantity actually stored. Unknown product ids are an
    /// error; out-of-range requests are not.
    pub fn set_quantity(&mut self, product_id: &str, requested: i64) -> CoreResult<i64> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;

        let ceiling = line.available_quantity.max(1);
        let stored = requested.max(1).min(ceiling);
        line.quantity = stored;
        Ok(stored)
    }

    /// Removes a line by product id. Returns whether a line was removed;
    /// absent ids are a no-op.
    pub fn remove_line(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Empties the cart and resets customer, discount and tax fields.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer_name.clear();
        self.customer_phone = None;
        self.discount_percent = Percent::zero();
        self.discount_amount = Money::zero();
        self.tax_percent = Percent::zero();
        self.created_at = Utc::now();
    }

    /// Updates customer fields. `None` leaves a field untouched; a blank
    /// phone clears it.
    pub fn set_customer_info(&mut self, name: Option<&str>, phone: Option<&str>) {
        if let Some(name) = name {
            self.customer_name = name.trim().to_string();
        }
        if let Some(phone) = phone {
            let phone = phone.trim();
            self.customer_phone = if phone.is_empty() {
                None
            } else {
                Some(phone.to_string())
            };
        }
    }

    /// Sets the cart-level discount rate. No cross-field validation; the
    /// precedence rule lives in [`Cart::effective_discount`].
    pub fn set_discount_percent(&mut self, rate: Percent) {
        self.discount_percent = rate;
    }

    /// Sets the cart-level flat discount.
    pub fn set_discount_amount(&mut self, amount: Money) {
        self.discount_amount = amount;
    }

    /// Sets the tax rate applied to the post-discount subtotal.
    pub fn set_tax_percent(&mut self, rate: Percent) {
        self.tax_percent = rate;
    }

    // =========================================================================
    // Derived Totals
    // =========================================================================

    /// Sum of all line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// The single discount actually applied to the subtotal.
    ///
    /// The rate strictly wins: while `discount_percent` is non-zero the flat
    /// amount is ignored entirely, even if it is larger.
    pub fn effective_discount(&self) -> Money {
        if !self.discount_percent.is_zero() {
            self.subtotal().percent_of(self.discount_percent)
        } else {
            self.discount_amount
        }
    }

    /// Tax on the post-discount subtotal; zero while no rate is set.
    pub fn tax_amount(&self) -> Money {
        if self.tax_percent.is_zero() {
            return Money::zero();
        }
        (self.subtotal() - self.effective_discount()).percent_of(self.tax_percent)
    }

    /// Grand total: subtotal - effective discount + tax.
    pub fn total(&self) -> Money {
        self.subtotal() - self.effective_discount() + self.tax_amount()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Lines in scan order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Finds a line by product id.
    pub fn find_line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_phone(&self) -> Option<&str> {
        self.customer_phone.as_deref()
    }

    pub fn discount_percent(&self) -> Percent {
        self.discount_percent
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn tax_percent(&self) -> Percent {
        self.tax_percent
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
