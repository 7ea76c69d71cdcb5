//! # Validation Module
//!
//! Field validators used at the two places input crosses into the engine:
//! operator-entered values (customer fields, scan codes, rates) and the
//! invoice request just before it is handed to the transport.

use crate::error::ValidationError;
use crate::types::InvoiceRequest;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum basis points a rate field accepts (100%).
pub const MAX_RATE_BPS: u32 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name.
///
/// Must be non-blank and at most 120 characters. Returns the trimmed name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: 120,
        });
    }

    Ok(name.to_string())
}

/// Validates a scanned barcode/SKU string.
///
/// Scanners occasionally emit stray whitespace; the code is trimmed before
/// any length check. Returns the trimmed code.
pub fn validate_scan_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "scan code".to_string(),
        });
    }

    if code.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "scan code".to_string(),
            max: 64,
        });
    }

    Ok(code.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a rate in basis points (0..=100%).
pub fn validate_rate_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > MAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_RATE_BPS as i64,
        });
    }

    Ok(())
}

/// Validates an amount in minor units: non-negative, zero allowed.
pub fn validate_amount_minor(field: &str, minor: i64) -> ValidationResult<()> {
    if minor < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Invoice Request Validation
// =============================================================================

/// Validates an invoice request at the serialization boundary, before any
/// network call.
///
/// The checkout path builds requests from a cart that already enforces these
/// rules; running them again here keeps the wire contract independent of the
/// producer.
pub fn validate_invoice_request(request: &InvoiceRequest) -> ValidationResult<()> {
    validate_customer_name(&request.customer_name)?;

    if request.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for item in &request.items {
        if item.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "item product id".to_string(),
            });
        }
        if item.quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: "item quantity".to_string(),
            });
        }
        validate_amount_minor("item unit price", item.unit_price.minor())?;
        validate_amount_minor("item discount amount", item.discount_amount.minor())?;
        validate_rate_bps("item discount percent", item.discount_percent.bps())?;
    }

    validate_rate_bps("cart discount percent", request.cart_discount_percent.bps())?;
    validate_amount_minor("cart discount amount", request.cart_discount_amount.minor())?;
    validate_rate_bps("tax percent", request.tax_percent.bps())?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Money, Percent};
    use crate::types::{InvoiceLine, PaymentMethod};

    fn valid_request() -> InvoiceRequest {
        InvoiceRequest {
            customer_name: "Walk-in".to_string(),
            customer_phone: None,
            items: vec![InvoiceLine {
                product_id: "prod-1".to_string(),
                quantity: 1,
                unit_price: Money::from_minor(250),
                discount_percent: Percent::zero(),
                discount_amount: Money::zero(),
            }],
            cart_discount_percent: Percent::zero(),
            cart_discount_amount: Money::zero(),
            tax_percent: Percent::zero(),
            payment_method: PaymentMethod::Cash,
        }
    }

    #[test]
    fn test_validate_customer_name() {
        assert_eq!(validate_customer_name("  Asha  ").unwrap(), "Asha");
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_scan_code() {
        assert_eq!(validate_scan_code(" 4890008100309\n").unwrap(), "4890008100309");
        assert!(validate_scan_code("").is_err());
        assert!(validate_scan_code(&"9".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_rate_bps() {
        assert!(validate_rate_bps("tax", 0).is_ok());
        assert!(validate_rate_bps("tax", 10_000).is_ok());
        assert!(validate_rate_bps("tax", 10_001).is_err());
    }

    #[test]
    fn test_validate_amount_minor() {
        assert!(validate_amount_minor("price", 0).is_ok());
        assert!(validate_amount_minor("price", 1099).is_ok());
        assert!(validate_amount_minor("price", -1).is_err());
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_invoice_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_request_rejects_blank_customer() {
        let mut request = valid_request();
        request.customer_name = "   ".to_string();
        assert!(validate_invoice_request(&request).is_err());
    }

    #[test]
    fn test_request_rejects_empty_items() {
        let mut request = valid_request();
        request.items.clear();
        assert!(matches!(
            validate_invoice_request(&request),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_request_rejects_bad_line() {
        let mut request = valid_request();
        request.items[0].quantity = 0;
        assert!(matches!(
            validate_invoice_request(&request),
            Err(ValidationError::MustBePositive { .. })
        ));

        let mut request = valid_request();
        request.items[0].unit_price = Money::from_minor(-100);
        assert!(validate_invoice_request(&request).is_err());

        let mut request = valid_request();
        request.items[0].discount_percent = Percent::from_bps(10_500);
        assert!(validate_invoice_request(&request).is_err());
    }
}
