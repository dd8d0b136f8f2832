//! Product Aggregate

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use crate::domain::value_objects::{Money, ProductId, Rating};

/// A catalog entry. Immutable once built; the catalog owns it and carts only refer to its id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    category: String,
    price: Money,
    discount_price: Option<Money>,
    rating: Rating,
    tags: Vec<String>,
    image_url: String,
    in_stock: bool,
}

impl Product {
    /// Starts a product with the required attributes; see [`ProductBuilder`].
    pub fn builder(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> ProductBuilder {
        ProductBuilder {
            id: id.into(), name: name.into(), description: String::new(), category: String::new(),
            price, discount_price: None, rating: Decimal::ZERO, tags: vec![],
            image_url: String::new(), in_stock: true,
        }
    }

    pub fn id(&self) -> &ProductId { &self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn description(&self) -> &str { &self.description }
    pub fn category(&self) -> &str { &self.category }
    pub fn price(&self) -> &Money { &self.price }
    pub fn discount_price(&self) -> Option<&Money> { self.discount_price.as_ref() }
    pub fn rating(&self) -> Rating { self.rating }
    pub fn tags(&self) -> &[String] { &self.tags }
    pub fn image_url(&self) -> &str { &self.image_url }
    pub fn is_in_stock(&self) -> bool { self.in_stock }

    /// Discount price if set, else the base price.
    pub fn effective_price(&self) -> &Money { self.discount_price.as_ref().unwrap_or(&self.price) }

    /// Case-insensitive substring match over name, description, category and tags.
    /// `needle` must already be lower-cased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

#[derive(Clone, Debug)]
pub struct ProductBuilder {
    id: ProductId,
    name: String,
    description: String,
    category: String,
    price: Money,
    discount_price: Option<Money>,
    rating: Decimal,
    tags: Vec<String>,
    image_url: String,
    in_stock: bool,
}

impl ProductBuilder {
    pub fn description(mut self, d: impl Into<String>) -> Self { self.description = d.into(); self }
    pub fn category(mut self, c: impl Into<String>) -> Self { self.category = c.into(); self }
    pub fn discount_price(mut self, p: Money) -> Self { self.discount_price = Some(p); self }
    pub fn rating(mut self, r: Decimal) -> Self { self.rating = r; self }
    pub fn tags<I, S>(mut self, tags: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
    pub fn image_url(mut self, url: impl Into<String>) -> Self { self.image_url = url.into(); self }
    pub fn in_stock(mut self, in_stock: bool) -> Self { self.in_stock = in_stock; self }

    pub fn build(self) -> Result<Product, ProductError> {
        if self.id.as_str().is_empty() { return Err(ProductError::MissingId); }
        if self.name.trim().is_empty() { return Err(ProductError::MissingName); }
        if !self.price.is_positive() { return Err(ProductError::NonPositivePrice); }
        if let Some(discount) = &self.discount_price {
            if discount.currency() != self.price.currency() { return Err(ProductError::CurrencyMismatch); }
            if !discount.is_positive() || discount.amount() >= self.price.amount() {
                return Err(ProductError::InvalidDiscount);
            }
        }
        let rating = Rating::new(self.rating).map_err(|_| ProductError::RatingOutOfRange(self.rating))?;
        let mut tags = self.tags;
        let mut seen = std::collections::HashSet::new();
        tags.retain(|t| seen.insert(t.clone()));
        Ok(Product {
            id: self.id, name: self.name, description: self.description, category: self.category,
            price: self.price, discount_price: self.discount_price, rating, tags,
            image_url: self.image_url, in_stock: self.in_stock,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("Missing id")]
    MissingId,
    #[error("Missing name")]
    MissingName,
    #[error("Price must be positive")]
    NonPositivePrice,
    #[error("Discount price must be positive and below the base price")]
    InvalidDiscount,
    #[error("Discount currency differs from base price currency")]
    CurrencyMismatch,
    #[error("Rating {0} outside 0..=5")]
    RatingOutOfRange(Decimal),
}
