//! # Session Error Type
//!
//! Unified, user-facing error for session operations.
//!
//! Every failure the session can hit (precondition checks, lookup failures,
//! invoicing failures, the re-entrancy gate) converts into a `PosError`
//! carrying a machine-readable code and a human-readable message. Nothing
//! below this type reaches the caller unconverted, and no failure is silent.
//!
//! ## Serialization
//! What the frontend receives when an operation fails:
//! ```json
//! {
//!   "code": "INVOICE_REJECTED",
//!   "message": "customer name is required"
//! }
//! ```

use serde::Serialize;
use vela_core::CoreError;

use crate::catalog::LookupError;
use crate::invoicing::InvoiceError;

/// Fallback message when the invoicing service fails without one.
const GENERIC_INVOICE_FAILURE: &str = "Could not reach the invoicing service";

/// User-facing error returned from session operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosError {
    /// Machine-readable code for programmatic handling.
    pub code: ErrorCode,

    /// Human-readable message for display.
    pub message: String,
}

/// Error codes for session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed.
    ValidationError,

    /// A cart invariant rejected the operation.
    CartError,

    /// The stock snapshot does not cover the requested quantity.
    InsufficientStock,

    /// The scanned code matched no product.
    ProductNotFound,

    /// The catalog service could not be reached.
    LookupFailed,

    /// The invoicing service rejected the request.
    InvoiceRejected,

    /// The invoicing service could not be reached.
    InvoiceUnavailable,

    /// A checkout is already in flight for this session.
    CheckoutInFlight,
}

impl PosError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        PosError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        PosError::new(ErrorCode::ValidationError, message)
    }

    /// The re-entrant checkout rejection.
    pub fn checkout_in_flight() -> Self {
        PosError::new(
            ErrorCode::CheckoutInFlight,
            "A checkout is already in progress",
        )
    }
}

impl From<CoreError> for PosError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::EmptyCart | CoreError::LineNotFound(_) | CoreError::CartTooLarge { .. } => {
                ErrorCode::CartError
            }
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::MissingCustomerName | CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        PosError::new(code, err.to_string())
    }
}

impl From<LookupError> for PosError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(code) => PosError::new(
                ErrorCode::ProductNotFound,
                format!("No product matches code {}", code),
            ),
            LookupError::Unavailable(message) => PosError::new(ErrorCode::LookupFailed, message),
        }
    }
}

impl From<InvoiceError> for PosError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::Rejected(message) => PosError::new(ErrorCode::InvoiceRejected, message),
            InvoiceError::Unavailable(message) => {
                let message = if message.trim().is_empty() {
                    GENERIC_INVOICE_FAILURE.to_string()
                } else {
                    message
                };
                PosError::new(ErrorCode::InvoiceUnavailable, message)
            }
        }
    }
}

impl std::fmt::Display for PosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for PosError {}
