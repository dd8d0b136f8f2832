//! Domain services
pub mod catalog_filter;
