//! # Invoicing Boundary
//!
//! The write-side collaborator: turning a cart into a durable invoice. The
//! invoice itself (numbering, persistence, fiscal rules) is owned by the
//! backend; the session submits one request per checkout attempt and
//! reconciles the outcome into cart state.

use async_trait::async_trait;
use thiserror::Error;
use vela_core::{InvoiceReceipt, InvoiceRequest};

/// Creates invoices from checkout requests.
///
/// Creation is atomic from the session's point of view: either a receipt
/// comes back or nothing was recorded. The session never retries on its own;
/// every retry is a fresh operator action.
#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// Submits an invoice-creation request.
    async fn create_invoice(&self, request: &InvoiceRequest) -> Result<InvoiceReceipt, InvoiceError>;
}

/// Failures at the invoicing boundary.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The service rejected the request (validation, conflict). The message
    /// is the service's own, surfaced to the operator for correction.
    #[error("Invoice rejected: {0}")]
    Rejected(String),

    /// The service could not be reached or answered unusably.
    #[error("Invoicing service unavailable: {0}")]
    Unavailable(String),
}
