//! Aggregates module
pub mod product;
pub mod filter_spec;
pub mod cart;

pub use product::{Product, ProductBuilder, ProductError};
pub use filter_spec::FilterSpec;
pub use cart::{CartLedger, CartLine, GuardRejection};
