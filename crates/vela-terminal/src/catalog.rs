//! # Product Catalog Boundary
//!
//! The read-side collaborator: resolving a scanned code to a product
//! snapshot. The catalog's internals (search, indexing, storage) live in the
//! backend; the session only needs this one operation.

use async_trait::async_trait;
use thiserror::Error;
use vela_core::ProductSnapshot;

/// Resolves scanned barcodes/SKUs against the product catalog.
///
/// One request per scan, no caching across scans: the snapshot's stock and
/// price are meant to be as fresh as the moment of scanning.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Resolves a code (barcode or SKU) to a product snapshot.
    async fn resolve(&self, code: &str) -> Result<ProductSnapshot, LookupError>;
}

/// Failures at the catalog boundary.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The code matched no product.
    #[error("No product matches code {0}")]
    NotFound(String),

    /// The catalog could not be queried (transport failure, bad response).
    #[error("Product lookup failed: {0}")]
    Unavailable(String),
}
