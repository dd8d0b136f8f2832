//! Adapters to the outside world
pub mod catalog_source;

pub use catalog_source::{sample_catalog, CatalogFuture, CatalogSource, LoadError, MockCatalogSource};
