//! # vela-terminal: POS Session Layer for Vela POS
//!
//! The orchestration layer for one terminal: session-held cart state, scan
//! resolution, the checkout protocol, and REST adapters for the two external
//! services the engine talks to. All pricing math lives below this crate in
//! [`vela_core`]; all I/O lives behind this crate's two collaborator traits.
//!
//! ## Data Flow
//! ```text
//! scan input ──► ProductLookup ──► Cart::add_or_merge ──► totals recompute
//!                                                              │
//!                                                              ▼
//!                                                        cart_view (UI)
//!                                                              │
//! tender ──► checkout protocol ──► InvoiceService ──► clear cart / surface
//!                                                     error for retry
//! ```
//!
//! ## Module Organization
//! ```text
//! vela_terminal/
//! ├── session.rs    PosSession state + cart view DTOs
//! ├── scan.rs       scan resolution (PosSession::scan)
//! ├── checkout.rs   checkout protocol (PosSession::checkout)
//! ├── catalog.rs    ProductLookup boundary trait
//! ├── invoicing.rs  InvoiceService boundary trait
//! ├── rest.rs       HTTP implementations of both traits
//! └── error.rs      user-facing PosError
//! ```

pub mod catalog;
pub mod checkout;
pub mod error;
pub mod invoicing;
pub mod rest;
pub mod scan;
pub mod session;

pub use catalog::{LookupError, ProductLookup};
pub use checkout::{build_invoice_request, CheckoutReceipt};
pub use error::{ErrorCode, PosError};
pub use invoicing::{InvoiceError, InvoiceService};
pub use rest::{RestBackend, RestConfig, RestInitError};
pub use scan::ScanOutcome;
pub use session::{CartTotals, CartView, PosSession};
