//! # Domain Types
//!
//! Data types crossing the two service boundaries: the product snapshot the
//! catalog lookup returns, and the invoice request/receipt pair exchanged
//! with the invoicing service.
//!
//! Wire-facing structs serialize with camelCase field names; enum tags are
//! snake_case.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percent};

// =============================================================================
// Product Snapshot
// =============================================================================

/// A product as resolved by the catalog at scan time.
///
/// The cart freezes price and stock from this snapshot when a line is
/// created; later catalog changes do not reach lines already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSnapshot {
    /// Opaque catalog identifier, unique per product.
    pub id: String,

    /// Display name shown on the POS screen and the invoice.
    pub name: String,

    /// Stock Keeping Unit, the business identifier.
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.), if the product carries one.
    pub barcode: Option<String>,

    /// Selling price in minor currency units.
    pub selling_price: Money,

    /// Cost price in minor currency units, for margin reporting.
    pub cost_price: Money,

    /// Units on hand at lookup time.
    pub stock_quantity: i64,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays. A small closed set the invoicing service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Card on an external terminal.
    Card,
    /// Mobile wallet (QR / NFC).
    MobileWallet,
}

// =============================================================================
// Invoice Request
// =============================================================================

/// One line item inside an invoice-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceLine {
    pub product_id: String,
    pub quantity: i64,
    /// Unit price in minor currency units.
    pub unit_price: Money,
    /// Per-line discount rate in basis points.
    pub discount_percent: Percent,
    /// Per-line flat discount in minor currency units.
    pub discount_amount: Money,
}

/// The invoice-creation payload sent to the invoicing service.
///
/// Every field is explicit and typed; the request is validated before it is
/// handed to the transport (see [`crate::validation::validate_invoice_request`]).
/// Rates cross the wire in basis points, amounts in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceRequest {
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub items: Vec<InvoiceLine>,
    /// Cart-level discount rate; wins over `cart_discount_amount` when
    /// non-zero.
    pub cart_discount_percent: Percent,
    pub cart_discount_amount: Money,
    pub tax_percent: Percent,
    pub payment_method: PaymentMethod,
}

/// The invoicing service's answer to a successful creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceReceipt {
    /// Durable identifier of the created invoice.
    pub invoice_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> InvoiceRequest {
        InvoiceRequest {
            customer_name: "Walk-in".to_string(),
            customer_phone: None,
            items: vec![InvoiceLine {
                product_id: "prod-1".to_string(),
                quantity: 2,
                unit_price: Money::from_minor(10_000),
                discount_percent: Percent::zero(),
                discount_amount: Money::zero(),
            }],
            cart_discount_percent: Percent::from_bps(1000),
            cart_discount_amount: Money::zero(),
            tax_percent: Percent::from_bps(1800),
            payment_method: PaymentMethod::Cash,
        }
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let json = serde_json::to_value(sample_request()).unwrap();
        assert_eq!(json["customerName"], "Walk-in");
        assert_eq!(json["items"][0]["productId"], "prod-1");
        assert_eq!(json["items"][0]["unitPrice"], 10_000);
        assert_eq!(json["cartDiscountPercent"], 1000);
        assert_eq!(json["taxPercent"], 1800);
        assert_eq!(json["paymentMethod"], "cash");
        // absent phone is omitted, not null
        assert!(json.get("customerPhone").is_none());
    }

    #[test]
    fn test_payment_method_tags() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::MobileWallet).unwrap(),
            "\"mobile_wallet\""
        );
        assert_eq!(
            serde_json::from_str::<PaymentMethod>("\"card\"").unwrap(),
            PaymentMethod::Card
        );
    }

    #[test]
    fn test_snapshot_round_trips() {
        let snapshot = ProductSnapshot {
            id: "prod-9".to_string(),
            name: "Cola 330ml".to_string(),
            sku: "COKE-330".to_string(),
            barcode: Some("4890008100309".to_string()),
            selling_price: Money::from_minor(250),
            cost_price: Money::from_minor(180),
            stock_quantity: 24,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"sellingPrice\":250"));
        let back: ProductSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
