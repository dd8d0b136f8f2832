//! OpenSASE Storefront
//!
//! Self-hosted storefront template: a homepage hero, a browsable catalog and a mock cart.
//!
//! ## Features
//! - Catalog search, category/price/stock/rating filters and sorting
//! - Cart ledger with exact decimal totals
//! - Simulated catalog load with loading and failure states
//! - Template-driven hero text with per-field fallbacks
//! - Store identity resolved once at startup

pub mod application;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;

use thiserror::Error;

use crate::domain::value_objects::ProductId;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Catalog is not loaded")]
    CatalogNotReady,

    #[error("Invalid request: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
