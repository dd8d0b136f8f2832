//! Filter specification for the catalog view

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use crate::domain::aggregates::Product;
use crate::domain::services::catalog_filter;
use crate::domain::value_objects::{PriceRange, Rating, SortOption};

/// The user's current constraints on the catalog.
///
/// Starts from [`FilterSpec::for_catalog`] and changes only through the action methods.
/// An empty category set means every category is allowed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    search_query: String,
    categories: BTreeSet<String>,
    price_range: PriceRange,
    in_stock_only: bool,
    min_rating: Rating,
    sort_option: SortOption,
    #[serde(skip)]
    default_price_range: PriceRange,
}

impl FilterSpec {
    /// Defaults seeded from the catalog's price extent.
    pub fn for_catalog(catalog: &[Product]) -> Self {
        Self::with_price_range(catalog_filter::price_extent(catalog).unwrap_or_default())
    }

    pub fn with_price_range(price_range: PriceRange) -> Self {
        Self {
            search_query: String::new(),
            categories: BTreeSet::new(),
            price_range,
            in_stock_only: false,
            min_rating: Rating::zero(),
            sort_option: SortOption::Featured,
            default_price_range: price_range,
        }
    }

    pub fn search_query(&self) -> &str { &self.search_query }
    pub fn categories(&self) -> &BTreeSet<String> { &self.categories }
    pub fn price_range(&self) -> PriceRange { self.price_range }
    pub fn in_stock_only(&self) -> bool { self.in_stock_only }
    pub fn min_rating(&self) -> Rating { self.min_rating }
    pub fn sort_option(&self) -> SortOption { self.sort_option }

    /// Adds the category if absent, removes it if present.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.categories.remove(category) {
            self.categories.insert(category.to_string());
        }
    }

    pub fn set_price_bounds(&mut self, min: Decimal, max: Decimal) { self.price_range = PriceRange::new(min, max); }
    pub fn toggle_in_stock(&mut self) { self.in_stock_only = !self.in_stock_only; }
    pub fn set_min_rating(&mut self, rating: Rating) { self.min_rating = rating; }
    pub fn set_sort(&mut self, sort: SortOption) { self.sort_option = sort; }
    pub fn set_search(&mut self, query: impl Into<String>) { self.search_query = query.into(); }

    /// Back to the catalog-derived defaults, search and sort included.
    pub fn reset(&mut self) { *self = Self::with_price_range(self.default_price_range); }

    /// Human-readable chips for the constraints currently narrowing the view.
    pub fn active_filters(&self) -> Vec<String> {
        let mut chips: Vec<String> = self.categories.iter().cloned().collect();
        if self.in_stock_only { chips.push("In Stock Only".to_string()); }
        if !self.min_rating.is_zero() { chips.push(format!("{}+ Stars", self.min_rating)); }
        chips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;

    fn catalog() -> Vec<Product> {
        vec![
            Product::builder("1", "A", Money::usd(Decimal::new(100, 0)))
                .discount_price(Money::usd(Decimal::new(80, 0))).build().unwrap(),
            Product::builder("2", "B", Money::usd(Decimal::new(50, 0))).build().unwrap(),
        ]
    }

    #[test]
    fn test_defaults_from_catalog() {
        let spec = FilterSpec::for_catalog(&catalog());
        assert_eq!(spec.price_range(), PriceRange::new(Decimal::new(50, 0), Decimal::new(80, 0)));
        assert!(spec.categories().is_empty());
        assert!(!spec.in_stock_only());
        assert!(spec.min_rating().is_zero());
        assert_eq!(spec.sort_option(), SortOption::Featured);
    }

    #[test]
    fn test_toggle_category_twice_restores() {
        let mut spec = FilterSpec::for_catalog(&catalog());
        spec.toggle_category("A");
        assert!(spec.categories().contains("A"));
        spec.toggle_category("A");
        assert!(spec.categories().is_empty());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut spec = FilterSpec::for_catalog(&catalog());
        let pristine = spec.clone();
        spec.toggle_category("A");
        spec.set_price_bounds(Decimal::ZERO, Decimal::ONE);
        spec.toggle_in_stock();
        spec.set_min_rating(Rating::new(Decimal::new(4, 0)).unwrap());
        spec.set_sort(SortOption::Rating);
        spec.set_search("chair");
        spec.reset();
        assert_eq!(spec, pristine);
    }

    #[test]
    fn test_active_filters() {
        let mut spec = FilterSpec::for_catalog(&catalog());
        assert!(spec.active_filters().is_empty());
        spec.toggle_category("Kitchen");
        spec.toggle_in_stock();
        spec.set_min_rating(Rating::new(Decimal::new(4, 0)).unwrap());
        assert_eq!(spec.active_filters(), vec!["Kitchen", "In Stock Only", "4+ Stars"]);
    }

    #[test]
    fn test_empty_catalog_defaults_to_zero_range() {
        let spec = FilterSpec::for_catalog(&[]);
        assert_eq!(spec.price_range(), PriceRange::default());
    }
}
