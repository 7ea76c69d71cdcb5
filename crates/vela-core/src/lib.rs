//! # vela-core: Pure Pricing & Cart Logic for Vela POS
//!
//! Everything a point-of-sale cart needs to price a sale, with zero I/O:
//! money arithmetic, the cart aggregate, the invoice request schema and the
//! validation rules that guard both.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   POS screen (web frontend)                         │
//! │        scan input ──► cart panel ──► tender ──► receipt             │
//! └───────────────────────────────┬─────────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────▼─────────────────────────────────────┐
//! │                 vela-terminal (session layer)                       │
//! │        scan resolution · checkout protocol · REST adapters          │
//! └───────────────────────────────┬─────────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────▼─────────────────────────────────────┐
//! │                  ★ vela-core (THIS CRATE) ★                         │
//! │                                                                     │
//! │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────┐         │
//! │   │  money   │  │   cart   │  │  types   │  │ validation │         │
//! │   │  Money   │  │  Cart    │  │ Snapshot │  │   rules    │         │
//! │   │  Percent │  │ CartLine │  │ Invoice* │  │            │         │
//! │   └──────────┘  └──────────┘  └──────────┘  └────────────┘         │
//! │                                                                     │
//! │   NO I/O · NO NETWORK · PURE FUNCTIONS                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. Deterministic: same inputs, same totals, every time.
//! 2. Integer money: minor currency units (i64) and basis-point rates; no
//!    floating point anywhere in the pricing pipeline.
//! 3. Typed errors: every failure is an enum variant with context.
//! 4. The cart is an explicit value, never ambient state; any number of
//!    carts can coexist in one process.

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use cart::{AddKind, AddOutcome, Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percent};
pub use types::{InvoiceLine, InvoiceReceipt, InvoiceRequest, PaymentMethod, ProductSnapshot};

/// Maximum distinct lines allowed in a single cart.
///
/// Keeps a runaway scanning session (or a stuck scanner) from growing a cart
/// without bound.
pub const MAX_CART_LINES: usize = 100;
