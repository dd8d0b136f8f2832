//! Shopper session: catalog load state, current filters and the cart.
//!
//! Every method runs synchronously under the session lock, so each user action is
//! fully applied (and the cart badge republished) before the next one is looked at.
//! Views are derived on request from the latest state and never cached.

use std::collections::BTreeSet;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use crate::domain::aggregates::{CartLedger, CartLine, FilterSpec, GuardRejection, Product};
use crate::domain::events::{CatalogEvent, DomainEvent};
use crate::domain::services::catalog_filter;
use crate::domain::value_objects::{Money, PriceRange, ProductId, Quantity, Rating, SortOption};
use crate::infrastructure::{CatalogSource, LoadError};
use crate::{Result, StorefrontError};

pub type SharedSession = Arc<Mutex<StoreSession>>;

/// Catalog data plus the values derived from it once per load.
#[derive(Clone, Debug)]
pub struct LoadedCatalog {
    products: Vec<Product>,
    categories: BTreeSet<String>,
    price_extent: PriceRange,
    loaded_at: DateTime<Utc>,
}

impl LoadedCatalog {
    fn new(products: Vec<Product>) -> Self {
        Self {
            categories: catalog_filter::all_categories(&products),
            price_extent: catalog_filter::price_extent(&products).unwrap_or_default(),
            products,
            loaded_at: Utc::now(),
        }
    }

    pub fn products(&self) -> &[Product] { &self.products }
    pub fn product(&self, id: &ProductId) -> Option<&Product> { self.products.iter().find(|p| p.id() == id) }
}

#[derive(Clone, Debug)]
pub enum CatalogState {
    Loading { attempt: u32 },
    Ready(LoadedCatalog),
    Failed { error: LoadError, attempt: u32 },
}

/// What the item-count badge shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartBadge {
    pub item_count: u64,
    pub subtotal: Money,
}

#[derive(Debug)]
pub struct StoreSession {
    catalog: CatalogState,
    attempts: u32,
    filters: FilterSpec,
    cart: CartLedger,
    badge: watch::Sender<CartBadge>,
}

impl StoreSession {
    /// A session whose first catalog load is already pending.
    pub fn new(cart: CartLedger) -> Self {
        let (badge, _) = watch::channel(badge_for(&cart));
        let mut session = Self {
            catalog: CatalogState::Loading { attempt: 1 },
            attempts: 1,
            filters: FilterSpec::with_price_range(PriceRange::default()),
            cart,
            badge,
        };
        session.log_event(DomainEvent::Catalog(CatalogEvent::LoadStarted { attempt: 1 }));
        session.drain_cart_events();
        session
    }

    pub fn into_shared(self) -> SharedSession { Arc::new(Mutex::new(self)) }

    pub fn catalog_state(&self) -> &CatalogState { &self.catalog }
    pub fn filters(&self) -> &FilterSpec { &self.filters }
    pub fn cart(&self) -> &CartLedger { &self.cart }
    pub fn is_loading(&self) -> bool { matches!(self.catalog, CatalogState::Loading { .. }) }

    pub fn subscribe_badge(&self) -> watch::Receiver<CartBadge> { self.badge.subscribe() }

    /// User-initiated reload. Ignored while a load is still pending.
    pub fn retry(&mut self) -> bool {
        if self.is_loading() { return false; }
        self.attempts += 1;
        self.catalog = CatalogState::Loading { attempt: self.attempts };
        self.log_event(DomainEvent::Catalog(CatalogEvent::LoadStarted { attempt: self.attempts }));
        true
    }

    /// Completes the pending load. Filters are re-seeded from the new catalog.
    pub fn finish_load(&mut self, result: std::result::Result<Vec<Product>, LoadError>) {
        let attempt = self.attempts;
        match result {
            Ok(products) => {
                let loaded = LoadedCatalog::new(products);
                self.filters = FilterSpec::with_price_range(loaded.price_extent);
                self.log_event(DomainEvent::Catalog(CatalogEvent::Loaded {
                    products: loaded.products.len(), categories: loaded.categories.len(),
                }));
                self.catalog = CatalogState::Ready(loaded);
            }
            Err(error) => {
                self.log_event(DomainEvent::Catalog(CatalogEvent::LoadFailed { reason: error.to_string() }));
                self.catalog = CatalogState::Failed { error, attempt };
            }
        }
    }

    fn ready(&self) -> Result<&LoadedCatalog> {
        match &self.catalog {
            CatalogState::Ready(loaded) => Ok(loaded),
            _ => Err(StorefrontError::CatalogNotReady),
        }
    }

    fn filter_action(&mut self, action: &str, f: impl FnOnce(&mut FilterSpec)) -> Result<()> {
        self.ready()?;
        f(&mut self.filters);
        tracing::debug!(action, filters = ?self.filters, "filters updated");
        Ok(())
    }

    pub fn toggle_category(&mut self, category: &str) -> Result<()> {
        self.filter_action("toggle_category", |f| f.toggle_category(category))
    }

    pub fn set_price_bounds(&mut self, min: Decimal, max: Decimal) -> Result<()> {
        self.filter_action("set_price_bounds", |f| f.set_price_bounds(min, max))
    }

    pub fn toggle_in_stock(&mut self) -> Result<()> {
        self.filter_action("toggle_in_stock", FilterSpec::toggle_in_stock)
    }

    pub fn set_min_rating(&mut self, rating: Rating) -> Result<()> {
        self.filter_action("set_min_rating", |f| f.set_min_rating(rating))
    }

    pub fn set_sort(&mut self, sort: SortOption) -> Result<()> {
        self.filter_action("set_sort", |f| f.set_sort(sort))
    }

    pub fn set_search(&mut self, query: &str) -> Result<()> {
        self.filter_action("set_search", |f| f.set_search(query))
    }

    pub fn reset_filters(&mut self) -> Result<()> {
        self.filter_action("reset", FilterSpec::reset)
    }

    /// Adds from the catalog view. Out-of-stock products cannot be added; the request is dropped.
    pub fn add_to_cart(&mut self, product_id: &ProductId, quantity: Quantity) -> Result<()> {
        let product = self.ready()?
            .product(product_id)
            .ok_or_else(|| StorefrontError::ProductNotFound(product_id.clone()))?
            .clone();
        let outcome = if product.is_in_stock() {
            self.cart.add_item(&product, quantity)
        } else {
            Err(GuardRejection::OutOfStock(product_id.clone()))
        };
        self.after_cart_mutation(outcome);
        Ok(())
    }

    pub fn set_cart_quantity(&mut self, product_id: &ProductId, requested: i64) {
        let outcome = self.cart.set_quantity(product_id, requested);
        self.after_cart_mutation(outcome);
    }

    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        let outcome = self.cart.remove_item(product_id);
        self.after_cart_mutation(outcome);
    }

    fn after_cart_mutation(&mut self, outcome: std::result::Result<(), GuardRejection>) {
        if let Err(rejection) = outcome {
            tracing::debug!(%rejection, "cart request ignored");
        }
        self.drain_cart_events();
        self.badge.send_replace(badge_for(&self.cart));
    }

    fn drain_cart_events(&mut self) {
        for event in self.cart.take_events() { self.log_event(event); }
    }

    fn log_event(&self, event: DomainEvent) {
        match &event {
            DomainEvent::Catalog(CatalogEvent::LoadFailed { reason }) => tracing::warn!(%reason, "catalog load failed"),
            DomainEvent::Catalog(e) => tracing::info!(event = ?e, "catalog"),
            DomainEvent::Cart(e) => tracing::info!(cart_id = %self.cart.id(), event = ?e, "cart"),
        }
    }

    /// The catalog page as it should be shown right now.
    pub fn store_view(&self) -> StoreView {
        match &self.catalog {
            CatalogState::Loading { attempt } => StoreView::Loading { attempt: *attempt },
            CatalogState::Failed { error, attempt } => StoreView::Error { message: error.to_string(), attempt: *attempt },
            CatalogState::Ready(loaded) => {
                let products: Vec<ProductCard> = catalog_filter::apply(&loaded.products, &self.filters)
                    .into_iter()
                    .map(ProductCard::from_product)
                    .collect();
                StoreView::Ready {
                    result_count: products.len(),
                    no_results: products.is_empty(),
                    products,
                    categories: loaded.categories.clone(),
                    price_extent: loaded.price_extent,
                    active_filters: self.filters.active_filters(),
                    filters: self.filters.clone(),
                    loaded_at: loaded.loaded_at,
                }
            }
        }
    }

    pub fn cart_view(&self) -> CartView {
        let subtotal = self.cart.subtotal();
        CartView {
            cart_id: self.cart.id().to_string(),
            lines: self.cart.lines().iter().map(|l| CartLineView { line_total: l.line_total(), line: l.clone() }).collect(),
            item_count: self.cart.item_count(),
            subtotal_display: subtotal.display(),
            subtotal,
            updated_at: self.cart.updated_at(),
        }
    }
}

fn badge_for(cart: &CartLedger) -> CartBadge {
    CartBadge { item_count: cart.item_count(), subtotal: cart.subtotal() }
}

/// One tile in the product grid.
#[derive(Clone, Debug, Serialize)]
pub struct ProductCard {
    #[serde(flatten)]
    pub product: Product,
    pub effective_price: Money,
    pub on_sale: bool,
    pub can_add_to_cart: bool,
}

impl ProductCard {
    fn from_product(product: &Product) -> Self {
        Self {
            effective_price: product.effective_price().clone(),
            on_sale: product.discount_price().is_some(),
            can_add_to_cart: product.is_in_stock(),
            product: product.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StoreView {
    Loading { attempt: u32 },
    Error { message: String, attempt: u32 },
    Ready {
        products: Vec<ProductCard>,
        result_count: usize,
        no_results: bool,
        categories: BTreeSet<String>,
        price_extent: PriceRange,
        filters: FilterSpec,
        active_filters: Vec<String>,
        loaded_at: DateTime<Utc>,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLine,
    pub line_total: Money,
}

#[derive(Clone, Debug, Serialize)]
pub struct CartView {
    pub cart_id: String,
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub subtotal: Money,
    pub subtotal_display: String,
    pub updated_at: DateTime<Utc>,
}

/// Runs one catalog fetch to completion and hands the result to the session.
/// There is no cancellation; a started load always reports back.
pub fn spawn_catalog_load(session: SharedSession, source: Arc<dyn CatalogSource>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = source.fetch_catalog().await;
        session.lock().await.finish_load(result);
    })
}

/// Demonstration cart shown before the shopper adds anything: product 1 once, product 3 twice.
pub fn seeded_cart(catalog: &[Product], currency: &str) -> CartLedger {
    let mut cart = CartLedger::new(currency);
    for (id, count) in [("1", 1), ("3", 2)] {
        let Some(product) = catalog.iter().find(|p| p.id().as_str() == id) else { continue };
        let Some(quantity) = Quantity::new(count) else { continue };
        if let Err(rejection) = cart.add_item(product, quantity) {
            tracing::warn!(%rejection, "could not seed demonstration cart");
        }
    }
    cart
}
