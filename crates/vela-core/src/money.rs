//! # Money & Percentage Arithmetic
//!
//! `Money` holds a monetary value as an integer count of the currency's
//! minor unit. `Percent` holds a rate in basis points. All percentage
//! application happens in i128 intermediate precision and rounds half-up at
//! the minor unit, so every value the pricing pipeline produces is exact.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Where Money flows                                                  │
//! │                                                                     │
//! │  ProductSnapshot.selling_price ──► CartLine.unit_price              │
//! │        │                                │                           │
//! │        └──► CartLine.line_total() ──► Cart.subtotal()               │
//! │                                          │                          │
//! │  Cart.effective_discount() ◄─────────────┤                          │
//! │  Cart.tax_amount()         ◄─────────────┤                          │
//! │  Cart.total()              ◄─────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding to whole currency units is a display/submission concern and is
//! exposed as a separate, explicit operation ([`Money::round_to_major`]);
//! nothing inside the pricing pipeline calls it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Minor units per major currency unit.
pub const MINOR_PER_MAJOR: i64 = 100;

/// Basis points in 100%.
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money
// =============================================================================

/// A monetary value in the currency's smallest unit.
///
/// Signed so that intermediate results (a discount larger than a line's
/// gross, for example) stay representable; the cart layer is responsible for
/// not constructing such states.
///
/// ## Example
/// ```rust
/// use vela_core::money::Money;
///
/// let price = Money::from_minor(10_000); // 100.00
/// let line = price.multiply_quantity(2);
/// assert_eq!(line.minor(), 20_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a value from major and minor parts.
    ///
    /// For negative amounts only the major part carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major-unit part.
    #[inline]
    pub const fn major_part(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit part (always 0..MINOR_PER_MAJOR).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use vela_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Computes `rate` percent of this amount, rounding half-up at the
    /// minor unit.
    ///
    /// Uses i128 internally so large amounts cannot overflow. Callers apply
    /// rates to non-negative amounts.
    ///
    /// ## Example
    /// ```rust
    /// use vela_core::money::{Money, Percent};
    ///
    /// let subtotal = Money::from_minor(18_000); // 180.00
    /// let tax = subtotal.percent_of(Percent::from_percent(18.0));
    /// assert_eq!(tax.minor(), 3_240); // 32.40
    /// ```
    pub fn percent_of(&self, rate: Percent) -> Money {
        // (amount * bps + 5000) / 10000: the +5000 rounds half-up
        let scaled = (self.0 as i128 * rate.bps() as i128 + BPS_SCALE / 2) / BPS_SCALE;
        Money(scaled as i64)
    }

    /// Rounds half-up to a whole number of major units.
    ///
    /// Used only at display/submission boundaries; the reference display
    /// format shows zero fraction digits.
    ///
    /// ## Example
    /// ```rust
    /// use vela_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(21_240).round_to_major().minor(), 21_200);
    /// assert_eq!(Money::from_minor(21_250).round_to_major().minor(), 21_300);
    /// ```
    pub fn round_to_major(&self) -> Money {
        let rem = self.0.rem_euclid(MINOR_PER_MAJOR);
        let base = self.0 - rem;
        if rem * 2 >= MINOR_PER_MAJOR {
            Money(base + MINOR_PER_MAJOR)
        } else {
            Money(base)
        }
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage rate in basis points (100 bps = 1%).
///
/// Discounts and tax rates are stored this way so that "18%" is the exact
/// integer 1800 rather than a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a rate from a percentage, rounding to the nearest basis point.
    pub fn from_percent(pct: f64) -> Self {
        Percent((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage, for display only.
    #[inline]
    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display. UI formatting (symbol, locale) happens in the
/// frontend.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}",
            sign,
            self.major_part().abs(),
            self.minor_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
