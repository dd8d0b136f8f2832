//! Domain events
use crate::domain::value_objects::ProductId;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Catalog(CatalogEvent),
    Cart(CartEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CatalogEvent {
    LoadStarted { attempt: u32 },
    Loaded { products: usize, categories: usize },
    LoadFailed { reason: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    ItemAdded { product_id: ProductId, quantity: u32, line_quantity: u32 },
    QuantityChanged { product_id: ProductId, from: u32, to: u32 },
    ItemRemoved { product_id: ProductId },
}
