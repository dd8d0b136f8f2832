//! Catalog filter engine
//!
//! Pure functions from `(catalog, FilterSpec)` to an ordered view. Filters compose
//! with AND across kinds; the category set is a membership test (OR within it).
//! All sorts are stable so ties keep catalog order.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use crate::domain::aggregates::{FilterSpec, Product};
use crate::domain::value_objects::{PriceRange, SortOption};

/// Products of `catalog` that satisfy every constraint in `spec`, in the spec's order.
pub fn apply<'a>(catalog: &'a [Product], spec: &FilterSpec) -> Vec<&'a Product> {
    let needle = spec.search_query().to_lowercase();
    let mut result: Vec<&Product> = catalog
        .iter()
        .filter(|p| needle.is_empty() || p.matches_query(&needle))
        .filter(|p| spec.categories().is_empty() || spec.categories().contains(p.category()))
        .filter(|p| spec.price_range().contains(p.effective_price().amount()))
        .filter(|p| !spec.in_stock_only() || p.is_in_stock())
        .filter(|p| p.rating() >= spec.min_rating())
        .collect();

    match spec.sort_option() {
        SortOption::PriceLow => result.sort_by_key(|p| p.effective_price().amount()),
        SortOption::PriceHigh => result.sort_by_key(|p| Reverse(p.effective_price().amount())),
        SortOption::Rating => result.sort_by_key(|p| Reverse(p.rating())),
        // No timestamps in the catalog; newest is reverse insertion order.
        SortOption::Newest => result.reverse(),
        SortOption::Featured => {}
    }
    result
}

/// Distinct categories, sorted.
pub fn all_categories(catalog: &[Product]) -> BTreeSet<String> {
    catalog.iter().map(|p| p.category().to_string()).collect()
}

/// Lowest and highest effective price, or `None` for an empty catalog.
pub fn price_extent(catalog: &[Product]) -> Option<PriceRange> {
    let prices = catalog.iter().map(|p| p.effective_price().amount());
    let min = prices.clone().min()?;
    let max = prices.max()?;
    Some(PriceRange::new(min, max))
}
