//! Value Objects for the storefront

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Product identifier. Opaque text, compared exactly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self { Self::new(value) }
}

/// Store identifier, resolved once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(Uuid);

impl StoreId {
    pub fn new(id: Uuid) -> Self { Self(id) }
    pub fn as_uuid(&self) -> &Uuid { &self.0 }
}

impl FromStr for StoreId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Uuid::parse_str(s.trim()).map(Self) }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn usd(amount: Decimal) -> Self { Self::new(amount, "USD") }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn is_positive(&self) -> bool { self.amount > Decimal::ZERO }
    pub fn multiply(&self, qty: u32) -> Money { Money::new(self.amount * Decimal::from(qty), &self.currency) }

    /// Amount rounded half away from zero to cents. Only for presentation.
    pub fn rounded(&self) -> Decimal {
        self.amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn display(&self) -> String {
        match self.currency.as_str() {
            "USD" => format!("${:.2}", self.rounded()),
            other => format!("{:.2} {}", self.rounded(), other),
        }
    }
}

impl Default for Money { fn default() -> Self { Self::zero("USD") } }

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.display()) }
}

/// Line quantity. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: u32) -> Option<Self> { (value >= 1).then_some(Self(value)) }

    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: Quantity) -> Self { Self(self.0.saturating_add(other.0)) }
}

impl Default for Quantity { fn default() -> Self { Self::ONE } }

impl TryFrom<u32> for Quantity {
    type Error = String;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("quantity must be at least 1, got {value}"))
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self { q.0 }
}

/// Customer rating on a 0 to 5 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(Decimal);

impl Rating {
    pub const MAX: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

    pub fn new(value: Decimal) -> Result<Self, RatingError> {
        if value < Decimal::ZERO || value > Self::MAX { return Err(RatingError::OutOfRange(value)); }
        Ok(Self(value))
    }
    pub fn zero() -> Self { Self(Decimal::ZERO) }
    pub fn value(&self) -> Decimal { self.0 }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }
}

impl Default for Rating { fn default() -> Self { Self::zero() } }

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0.normalize()) }
}

#[derive(Debug, Clone, Error)]
pub enum RatingError {
    #[error("Rating {0} outside 0..=5")]
    OutOfRange(Decimal),
}

/// Inclusive bounds on effective price. `min > max` is representable and matches nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange { pub min: Decimal, pub max: Decimal }

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> Self { Self { min, max } }
    pub fn contains(&self, amount: Decimal) -> bool { amount >= self.min && amount <= self.max }
}

/// Ordering applied to the filtered catalog view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    Featured,
    Newest,
    PriceLow,
    PriceHigh,
    Rating,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Featured => "featured",
            SortOption::Newest => "newest",
            SortOption::PriceLow => "price-low",
            SortOption::PriceHigh => "price-high",
            SortOption::Rating => "rating",
        }
    }

    /// Unknown values fall back to featured.
    pub fn parse_or_featured(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "newest" => SortOption::Newest,
            "price-low" => SortOption::PriceLow,
            "price-high" => SortOption::PriceHigh,
            "rating" => SortOption::Rating,
            _ => SortOption::Featured,
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
