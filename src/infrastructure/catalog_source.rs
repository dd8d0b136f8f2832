//! Catalog providers

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use rust_decimal::Decimal;
use thiserror::Error;
use crate::domain::aggregates::{Product, ProductError};
use crate::domain::value_objects::Money;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Failed to load products. Please try again later.")]
    Unavailable(String),
    #[error("Catalog entry rejected: {0}")]
    InvalidProduct(#[from] ProductError),
}

pub type CatalogFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Product>, LoadError>> + Send + 'a>>;

/// Where the storefront gets its products from. No retries happen here.
pub trait CatalogSource: Send + Sync + 'static {
    fn fetch_catalog(&self) -> CatalogFuture<'_>;
}

/// Hard-coded catalog served after a fixed artificial delay, standing in for a network fetch.
#[derive(Clone, Debug)]
pub struct MockCatalogSource {
    delay: Duration,
}

impl MockCatalogSource {
    pub fn new(delay: Duration) -> Self { Self { delay } }
}

impl CatalogSource for MockCatalogSource {
    fn fetch_catalog(&self) -> CatalogFuture<'_> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            sample_catalog().map_err(LoadError::from)
        })
    }
}

fn usd(cents: i64) -> Money { Money::usd(Decimal::new(cents, 2)) }

/// The template's demonstration products, in catalog order.
pub fn sample_catalog() -> Result<Vec<Product>, ProductError> {
    const IMAGE: &str = "/placeholder.svg?height=300&width=300";
    Ok(vec![
        Product::builder("1", "Premium Wireless Headphones", usd(29999))
            .discount_price(usd(24999)).rating(Decimal::new(48, 1)).category("Electronics")
            .tags(["audio", "wireless", "premium"]).image_url(IMAGE).in_stock(true)
            .description("High-quality wireless headphones with noise cancellation and premium sound.")
            .build()?,
        Product::builder("2", "Ergonomic Office Chair", usd(34999))
            .rating(Decimal::new(45, 1)).category("Furniture")
            .tags(["office", "ergonomic", "chair"]).image_url(IMAGE).in_stock(true)
            .description("Comfortable ergonomic office chair with lumbar support and adjustable features.")
            .build()?,
        Product::builder("3", "Smart Home Hub", usd(12999))
            .discount_price(usd(9999)).rating(Decimal::new(42, 1)).category("Electronics")
            .tags(["smart home", "IoT", "automation"]).image_url(IMAGE).in_stock(true)
            .description("Central hub for controlling all your smart home devices with voice commands.")
            .build()?,
        Product::builder("4", "Organic Cotton T-Shirt", usd(2999))
            .rating(Decimal::new(40, 1)).category("Clothing")
            .tags(["organic", "sustainable", "casual"]).image_url(IMAGE).in_stock(false)
            .description("Soft, comfortable t-shirt made from 100% organic cotton.")
            .build()?,
        Product::builder("5", "Professional Chef Knife", usd(8999))
            .rating(Decimal::new(49, 1)).category("Kitchen")
            .tags(["cooking", "professional", "stainless steel"]).image_url(IMAGE).in_stock(true)
            .description("High-carbon stainless steel chef knife for precise cutting and chopping.")
            .build()?,
        Product::builder("6", "Fitness Smartwatch", usd(19999))
            .discount_price(usd(16999)).rating(Decimal::new(46, 1)).category("Electronics")
            .tags(["fitness", "wearable", "health"]).image_url(IMAGE).in_stock(true)
            .description("Track your fitness goals, heart rate, and sleep patterns with this advanced smartwatch.")
            .build()?,
        Product::builder("7", "Ceramic Plant Pot Set", usd(4999))
            .rating(Decimal::new(43, 1)).category("Home & Garden")
            .tags(["ceramic", "plants", "decoration"]).image_url(IMAGE).in_stock(true)
            .description("Set of 3 ceramic plant pots in different sizes with drainage holes.")
            .build()?,
        Product::builder("8", "Leather Messenger Bag", usd(15999))
            .rating(Decimal::new(47, 1)).category("Accessories")
            .tags(["leather", "bag", "business"]).image_url(IMAGE).in_stock(true)
            .description("Genuine leather messenger bag with multiple compartments for business professionals.")
            .build()?,
    ])
}
