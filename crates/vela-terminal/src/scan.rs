//! # Scan Resolution
//!
//! Turns a raw scanner string into a cart mutation: validate the code,
//! resolve it against the catalog (one request, no caching), merge the
//! snapshot into the cart. Every attempt settles with exactly one outcome
//! the UI can act on before re-arming the scan input.

use tracing::{debug, info, warn};

use serde::Serialize;
use vela_core::{validation, AddKind, CartLine, CoreError};

use crate::catalog::LookupError;
use crate::error::PosError;
use crate::session::PosSession;

/// How a scan attempt settled.
///
/// `NotFound` is a routine outcome (mistyped SKU, foreign barcode), not an
/// error; the cart is unchanged and the operator simply scans again.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// First scan of this product: a new line, quantity 1.
    Added { line: CartLine },
    /// Repeat scan: the existing line, quantity incremented.
    Merged { line: CartLine },
    /// The code matched no product.
    NotFound { code: String },
}

impl PosSession {
    /// Resolves a scanned code and merges the product into the cart.
    ///
    /// Errors (invalid code, catalog unreachable, cart invariant rejected
    /// the add) leave the cart unchanged, like every non-merging outcome.
    pub async fn scan(&self, raw_code: &str) -> Result<ScanOutcome, PosError> {
        let code = validation::validate_scan_code(raw_code)
            .map_err(|err| PosError::from(CoreError::from(err)))?;
        debug!(code = %code, "scan");

        let snapshot = match self.catalog.resolve(&code).await {
            Ok(snapshot) => snapshot,
            Err(LookupError::NotFound(_)) => {
                debug!(code = %code, "scan matched no product");
                return Ok(ScanOutcome::NotFound { code });
            }
            Err(err) => {
                warn!(code = %code, error = %err, "product lookup failed");
                return Err(err.into());
            }
        };

        let outcome = self.with_cart_mut(|cart| cart.add_or_merge(&snapshot))?;
        info!(
            sku = %outcome.line.sku,
            quantity = outcome.line.quantity,
            "line scanned"
        );

        Ok(match outcome.kind {
            AddKind::Added => ScanOutcome::Added { line: outcome.line },
            AddKind::Merged => ScanOutcome::Merged { line: outcome.line },
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::ErrorCode;
    use crate::session::test_doubles::{snapshot, FixtureCatalog, ScriptedInvoicer};

    fn session_with_catalog(catalog: FixtureCatalog) -> (PosSession, Arc<FixtureCatalog>) {
        crate::session::test_doubles::init_tracing();
        let catalog = Arc::new(catalog);
        let session = PosSession::new(catalog.clone(), Arc::new(ScriptedInvoicer::succeeding()));
        (session, catalog)
    }

    #[tokio::test]
    async fn test_scan_adds_then_merges() {
        let (session, _) =
            session_with_catalog(FixtureCatalog::new().with_product(snapshot("a", 10_000, 5)));

        let first = session.scan("SKU-a").await.unwrap();
        assert!(matches!(first, ScanOutcome::Added { ref line } if line.quantity == 1));

        let second = session.scan("SKU-a").await.unwrap();
        assert!(matches!(second, ScanOutcome::Merged { ref line } if line.quantity == 2));

        let view = session.cart_view();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.totals.total.minor(), 20_000);
    }

    #[tokio::test]
    async fn test_scan_resolves_by_barcode_too() {
        let product = snapshot("a", 250, 9);
        let barcode = product.barcode.clone().unwrap();
        let (session, _) = session_with_catalog(FixtureCatalog::new().with_product(product));

        let outcome = session.scan(&barcode).await.unwrap();
        assert!(matches!(outcome, ScanOutcome::Added { .. }));
    }

    #[tokio::test]
    async fn test_scan_trims_scanner_whitespace() {
        let (session, catalog) =
            session_with_catalog(FixtureCatalog::new().with_product(snapshot("a", 250, 9)));

        let outcome = session.scan("  SKU-a\n").await.unwrap();
        assert!(matches!(outcome, ScanOutcome::Added { .. }));
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_code_leaves_cart_unchanged() {
        let (session, catalog) = session_with_catalog(FixtureCatalog::new());

        let outcome = session.scan("GHOST-1").await.unwrap();
        assert!(matches!(outcome, ScanOutcome::NotFound { ref code } if code == "GHOST-1"));
        assert!(session.cart_view().lines.is_empty());
        assert_eq!(catalog.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blank_code_never_hits_catalog() {
        let (session, catalog) = session_with_catalog(FixtureCatalog::new());

        let err = session.scan("   ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(catalog.call_count(), 0);
    }

    #[tokio::test]
    async fn test_catalog_outage_surfaces_error() {
        let (session, _) = session_with_catalog(FixtureCatalog::offline());

        let err = session.scan("SKU-a").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::LookupFailed);
        assert!(session.cart_view().lines.is_empty());
    }

    #[tokio::test]
    async fn test_scan_past_stock_snapshot_is_rejected() {
        let (session, _) =
            session_with_catalog(FixtureCatalog::new().with_product(snapshot("a", 100, 1)));

        session.scan("SKU-a").await.unwrap();
        let err = session.scan("SKU-a").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(session.cart_view().lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_zero_stock_product_is_rejected() {
        let (session, _) =
            session_with_catalog(FixtureCatalog::new().with_product(snapshot("a", 100, 0)));

        let err = session.scan("SKU-a").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(session.cart_view().lines.is_empty());
    }
}
