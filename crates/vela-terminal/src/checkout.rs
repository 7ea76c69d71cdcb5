//! # Checkout Protocol
//!
//! Converts the cart into a durable invoice through the invoicing service.
//!
//! ```text
//! ┌──────┐ preconditions ┌────────────┐ one request ┌────────────┐
//! │ Idle │──────────────►│ Validating │────────────►│ Submitting │
//! └──────┘               └─────┬──────┘             └─────┬──────┘
//!     ▲                        │ empty cart /             │
//!     │                        │ blank customer           ├── Succeeded:
//!     │                        ▼                          │   surface invoice
//!     └──────────────── error, no network,                │   number, clear cart
//!                       cart unchanged                    └── Failed:
//!                                                             surface message,
//!                                                             cart untouched
//! ```
//!
//! Exactly one invoice-creation call per attempt, never an automatic retry.
//! A submission gate rejects re-entrant checkouts while one is in flight, so
//! a double-tap on the tender button cannot create two invoices.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{debug, info, warn};

use vela_core::{
    validation, Cart, CoreError, CoreResult, InvoiceLine, InvoiceRequest, Money, PaymentMethod,
};

use crate::error::PosError;
use crate::session::PosSession;

// =============================================================================
// Receipt
// =============================================================================

/// What a successful checkout hands back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// Durable invoice identifier from the invoicing service.
    pub invoice_number: String,

    /// Grand total at submission time.
    pub total: Money,

    /// Number of lines invoiced.
    pub line_count: usize,
}

// =============================================================================
// Request Serialization
// =============================================================================

/// Serializes a cart into a validated invoice request.
///
/// Preconditions (the only client-side checks; stock is not re-validated at
/// checkout): the cart has at least one line and a non-blank customer name.
/// The built request is run through
/// [`validation::validate_invoice_request`] before it may touch a transport.
pub fn build_invoice_request(
    cart: &Cart,
    payment_method: PaymentMethod,
) -> CoreResult<InvoiceRequest> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    if cart.customer_name().trim().is_empty() {
        return Err(CoreError::MissingCustomerName);
    }

    let items = cart
        .lines()
        .iter()
        .map(|line| InvoiceLine {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_percent: line.discount_percent,
            discount_amount: line.discount_amount,
        })
        .collect();

    let request = InvoiceRequest {
        customer_name: cart.customer_name().to_string(),
        customer_phone: cart.customer_phone().map(str::to_string),
        items,
        cart_discount_percent: cart.discount_percent(),
        cart_discount_amount: cart.discount_amount(),
        tax_percent: cart.tax_percent(),
        payment_method,
    };

    validation::validate_invoice_request(&request)?;
    Ok(request)
}

// =============================================================================
// Submission Gate
// =============================================================================

/// Single-writer guard for the submission window.
///
/// `try_acquire` atomically checks-and-sets; the returned permit releases the
/// gate on drop, so both settlement paths (and early returns) re-open it.
pub(crate) struct SubmissionGate(AtomicBool);

impl SubmissionGate {
    pub(crate) fn new() -> Self {
        SubmissionGate(AtomicBool::new(false))
    }

    pub(crate) fn try_acquire(&self) -> Option<SubmissionPermit<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionPermit(&self.0))
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub(crate) struct SubmissionPermit<'a>(&'a AtomicBool);

impl Drop for SubmissionPermit<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// Checkout Entry Point
// =============================================================================

impl PosSession {
    /// Runs one checkout attempt against the invoicing service.
    ///
    /// On success the invoice number is surfaced and the cart is cleared for
    /// the next sale. On any failure the cart is left exactly as it was so
    /// the operator can correct and retry.
    pub async fn checkout(&self, payment_method: PaymentMethod) -> Result<CheckoutReceipt, PosError> {
        let _permit = self
            .gate
            .try_acquire()
            .ok_or_else(PosError::checkout_in_flight)?;
        debug!(method = ?payment_method, "checkout");

        let (request, total) = self.with_cart(|cart| {
            build_invoice_request(cart, payment_method).map(|request| (request, cart.total()))
        })?;

        match self.invoicing.create_invoice(&request).await {
            Ok(receipt) => {
                self.with_cart_mut(Cart::clear);
                info!(
                    invoice = %receipt.invoice_number,
                    total = %total,
                    lines = request.items.len(),
                    "checkout complete"
                );
                Ok(CheckoutReceipt {
                    invoice_number: receipt.invoice_number,
                    total,
                    line_count: request.items.len(),
                })
            }
            Err(err) => {
                warn!(error = %err, "invoice creation failed, cart left intact");
                Err(err.into())
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
