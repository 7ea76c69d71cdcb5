//! # POS Session
//!
//! One `PosSession` per terminal: the cart for the sale in progress plus the
//! two injected collaborators. Sessions are explicit values, never ambient
//! globals, so a process can run any number of terminals side by side and
//! tests construct them in isolation.
//!
//! ## Thread Safety
//! The cart lives behind a `Mutex` accessed through short closures
//! (`with_cart` / `with_cart_mut`); the lock is never held across an await
//! point. The async operations (scan resolution, checkout submission) do
//! their I/O outside the lock and apply the result in a second, separate
//! critical section.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Session Operations                             │
//! │                                                                     │
//! │  UI action                 Session method          Cart change      │
//! │  ─────────                 ──────────────          ───────────      │
//! │  Scan barcode ───────────► scan()            ────► add_or_merge     │
//! │  Edit quantity ──────────► set_quantity()    ────► clamp + store    │
//! │  Remove row ─────────────► remove_line()     ────► retain           │
//! │  Void sale ──────────────► clear_cart()      ────► clear            │
//! │  Tender ─────────────────► checkout()        ────► clear on success │
//! │  Render cart panel ──────► cart_view()       ────► (read only)      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::debug;

use vela_core::{Cart, CartLine, Money, Percent};

use crate::catalog::ProductLookup;
use crate::checkout::SubmissionGate;
use crate::error::PosError;
use crate::invoicing::InvoiceService;

// =============================================================================
// Session
// =============================================================================

/// State and collaborators for one POS terminal session.
pub struct PosSession {
    pub(crate) cart: Mutex<Cart>,
    pub(crate) catalog: Arc<dyn ProductLookup>,
    pub(crate) invoicing: Arc<dyn InvoiceService>,
    pub(crate) gate: SubmissionGate,
}

impl PosSession {
    /// Creates a session with an empty cart.
    pub fn new(catalog: Arc<dyn ProductLookup>, invoicing: Arc<dyn InvoiceService>) -> Self {
        PosSession {
            cart: Mutex::new(Cart::new()),
            catalog,
            invoicing,
            gate: SubmissionGate::new(),
        }
    }

    /// Runs a closure with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Runs a closure with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }

    /// Snapshot of the cart for rendering.
    pub fn cart_view(&self) -> CartView {
        self.with_cart(|cart| CartView::from(cart))
    }

    /// Whether a checkout submission is currently in flight.
    pub fn checkout_in_flight(&self) -> bool {
        self.gate.is_busy()
    }

    // =========================================================================
    // Cart Edits
    // =========================================================================

    /// Sets a line's quantity; the aggregate clamps to the valid range and
    /// the stored value comes back for UI feedback.
    pub fn set_quantity(&self, product_id: &str, quantity: i64) -> Result<i64, PosError> {
        debug!(product_id = %product_id, quantity = %quantity, "set_quantity");
        self.with_cart_mut(|cart| cart.set_quantity(product_id, quantity))
            .map_err(PosError::from)
    }

    /// Removes a line; absent ids are a no-op.
    pub fn remove_line(&self, product_id: &str) -> bool {
        debug!(product_id = %product_id, "remove_line");
        self.with_cart_mut(|cart| cart.remove_line(product_id))
    }

    /// Voids the sale in progress.
    pub fn clear_cart(&self) {
        debug!("clear_cart");
        self.with_cart_mut(Cart::clear);
    }

    /// Updates customer fields.
    pub fn set_customer_info(&self, name: Option<&str>, phone: Option<&str>) {
        self.with_cart_mut(|cart| cart.set_customer_info(name, phone));
    }

    /// Sets the cart-level discount rate.
    pub fn set_discount_percent(&self, rate: Percent) {
        self.with_cart_mut(|cart| cart.set_discount_percent(rate));
    }

    /// Sets the cart-level flat discount.
    pub fn set_discount_amount(&self, amount: Money) {
        self.with_cart_mut(|cart| cart.set_discount_amount(amount));
    }

    /// Sets the tax rate.
    pub fn set_tax_percent(&self, rate: Percent) {
        self.with_cart_mut(|cart| cart.set_tax_percent(rate));
    }
}

// =============================================================================
// View DTOs
// =============================================================================

/// Cart totals for the POS panel footer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            discount: cart.effective_discount(),
            tax: cart.tax_amount(),
            total: cart.total(),
        }
    }
}

/// Full cart snapshot: lines plus totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        CartView {
            lines: cart.lines().to_vec(),
            customer_name: cart.customer_name().to_string(),
            customer_phone: cart.customer_phone().map(str::to_string),
            totals: CartTotals::from(cart),
        }
    }
}

// =============================================================================
// Test Doubles
// =============================================================================

/// In-memory collaborators for session tests. Call counts let tests assert
/// that precondition failures never reach the network.
#[cfg(test)]
pub(crate) mod test_doubles {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Semaphore;
    use uuid::Uuid;

    use vela_core::{InvoiceReceipt, InvoiceRequest, Money, ProductSnapshot};

    use crate::catalog::{LookupError, ProductLookup};
    use crate::invoicing::{InvoiceError, InvoiceService};

    /// Installs a test subscriber once; `RUST_LOG` controls verbosity.
    pub(crate) fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    pub(crate) fn snapshot(id: &str, price_minor: i64, stock: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: id.to_string(),
            name: format!("Product {}", id),
            sku: format!("SKU-{}", id),
            barcode: Some(format!("2000000{}", id.len())),
            selling_price: Money::from_minor(price_minor),
            cost_price: Money::from_minor(price_minor / 2),
            stock_quantity: stock,
        }
    }

    /// Catalog double resolving codes against a fixed product map.
    pub(crate) struct FixtureCatalog {
        products: HashMap<String, ProductSnapshot>,
        offline: bool,
        pub(crate) calls: AtomicUsize,
    }

    impl FixtureCatalog {
        pub(crate) fn new() -> Self {
            FixtureCatalog {
                products: HashMap::new(),
                offline: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn offline() -> Self {
            FixtureCatalog {
                offline: true,
                ..FixtureCatalog::new()
            }
        }

        /// Registers a product under its SKU and barcode.
        pub(crate) fn with_product(mut self, snapshot: ProductSnapshot) -> Self {
            if let Some(barcode) = &snapshot.barcode {
                self.products.insert(barcode.clone(), snapshot.clone());
            }
            self.products.insert(snapshot.sku.clone(), snapshot);
            self
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductLookup for FixtureCatalog {
        async fn resolve(&self, code: &str) -> Result<ProductSnapshot, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(LookupError::Unavailable("catalog offline".to_string()));
            }
            self.products
                .get(code)
                .cloned()
                .ok_or_else(|| LookupError::NotFound(code.to_string()))
        }
    }

    /// What the invoicing double answers with.
    pub(crate) enum InvoicerMode {
        Succeed { invoice_number: Option<String> },
        Reject(String),
        Offline,
    }

    /// Invoicing double. With a hold semaphore it parks inside
    /// `create_invoice` until the test releases a permit, which lets tests
    /// observe the in-flight window.
    pub(crate) struct ScriptedInvoicer {
        mode: InvoicerMode,
        hold: Option<Arc<Semaphore>>,
        pub(crate) calls: AtomicUsize,
    }

    impl ScriptedInvoicer {
        pub(crate) fn succeeding() -> Self {
            ScriptedInvoicer {
                mode: InvoicerMode::Succeed {
                    invoice_number: None,
                },
                hold: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn with_invoice_number(number: &str) -> Self {
            ScriptedInvoicer {
                mode: InvoicerMode::Succeed {
                    invoice_number: Some(number.to_string()),
                },
                hold: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn rejecting(message: &str) -> Self {
            ScriptedInvoicer {
                mode: InvoicerMode::Reject(message.to_string()),
                hold: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn offline() -> Self {
            ScriptedInvoicer {
                mode: InvoicerMode::Offline,
                hold: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn held_by(mut self, hold: Arc<Semaphore>) -> Self {
            self.hold = Some(hold);
            self
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InvoiceService for ScriptedInvoicer {
        async fn create_invoice(
            &self,
            _request: &InvoiceRequest,
        ) -> Result<InvoiceReceipt, InvoiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(hold) = &self.hold {
                hold.acquire()
                    .await
                    .expect("hold semaphore closed")
                    .forget();
            }
            match &self.mode {
                InvoicerMode::Succeed { invoice_number } => Ok(InvoiceReceipt {
                    invoice_number: invoice_number
                        .clone()
                        .unwrap_or_else(|| format!("INV-{}", Uuid::new_v4().simple())),
                }),
                InvoicerMode::Reject(message) => Err(InvoiceError::Rejected(message.clone())),
                InvoicerMode::Offline => Err(InvoiceError::Unavailable(String::new())),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
