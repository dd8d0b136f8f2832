//! Storefront domain: catalog, filtering and cart bookkeeping
pub mod aggregates;
pub mod events;
pub mod services;
pub mod value_objects;
