//! Cart Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use crate::domain::aggregates::Product;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{Money, ProductId, Quantity};

/// Line items in insertion order, unique by product id.
///
/// Mutations take effect immediately. Requests that would break an invariant are
/// refused with a [`GuardRejection`] and leave the ledger untouched.
#[derive(Clone, Debug)]
pub struct CartLedger {
    id: String,
    lines: Vec<CartLine>,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub unit_price: Money,
    pub quantity: Quantity,
}

impl CartLine {
    pub fn line_total(&self) -> Money { self.unit_price.multiply(self.quantity.value()) }
}

/// A mutation that was validated and discarded. Never shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardRejection {
    #[error("quantity {requested} is below 1")]
    QuantityBelowMinimum { requested: i64 },
    #[error("quantity {requested} exceeds the largest line quantity")]
    QuantityTooLarge { requested: i64 },
    #[error("product {0} is not in the cart")]
    LineNotFound(ProductId),
    #[error("product {product_id} is priced in {product_currency}, cart uses {cart_currency}")]
    CurrencyMismatch { product_id: ProductId, product_currency: String, cart_currency: String },
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),
}

impl CartLedger {
    pub fn new(currency: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(), lines: vec![], currency: currency.to_string(),
            created_at: now, updated_at: now, events: vec![],
        }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> { self.lines.iter().find(|l| &l.product_id == product_id) }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    /// Sum of quantities across lines.
    pub fn item_count(&self) -> u64 { self.lines.iter().map(|l| u64::from(l.quantity.value())).sum() }

    /// Exact sum of `quantity * unit price`. Round only when displaying.
    pub fn subtotal(&self) -> Money {
        let amount: Decimal = self.lines.iter().map(|l| l.line_total().amount()).sum();
        Money::new(amount, &self.currency)
    }

    /// Merges into an existing line for the same product, otherwise appends.
    pub fn add_item(&mut self, product: &Product, quantity: Quantity) -> Result<(), GuardRejection> {
        let unit_price = product.effective_price();
        if unit_price.currency() != self.currency {
            return Err(GuardRejection::CurrencyMismatch {
                product_id: product.id().clone(),
                product_currency: unit_price.currency().to_string(),
                cart_currency: self.currency.clone(),
            });
        }
        let line_quantity = match self.lines.iter_mut().find(|l| &l.product_id == product.id()) {
            Some(existing) => {
                existing.quantity = existing.quantity.add(quantity);
                existing.quantity
            }
            None => {
                self.lines.push(CartLine {
                    product_id: product.id().clone(),
                    name: product.name().to_string(),
                    image_url: product.image_url().to_string(),
                    unit_price: unit_price.clone(),
                    quantity,
                });
                quantity
            }
        };
        self.touch();
        self.raise_event(DomainEvent::Cart(CartEvent::ItemAdded {
            product_id: product.id().clone(), quantity: quantity.value(), line_quantity: line_quantity.value(),
        }));
        Ok(())
    }

    /// Replaces a line's quantity. Anything below 1 is refused rather than removing the line.
    pub fn set_quantity(&mut self, product_id: &ProductId, requested: i64) -> Result<(), GuardRejection> {
        if requested < 1 { return Err(GuardRejection::QuantityBelowMinimum { requested }); }
        let quantity = u32::try_from(requested).ok().and_then(Quantity::new)
            .ok_or(GuardRejection::QuantityTooLarge { requested })?;
        let line = self.lines.iter_mut().find(|l| &l.product_id == product_id)
            .ok_or_else(|| GuardRejection::LineNotFound(product_id.clone()))?;
        let from = line.quantity.value();
        if from == quantity.value() { return Ok(()); }
        line.quantity = quantity;
        self.touch();
        self.raise_event(DomainEvent::Cart(CartEvent::QuantityChanged { product_id: product_id.clone(), from, to: quantity.value() }));
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<(), GuardRejection> {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product_id != product_id);
        if self.lines.len() == before { return Err(GuardRejection::LineNotFound(product_id.clone())); }
        self.touch();
        self.raise_event(DomainEvent::Cart(CartEvent::ItemRemoved { product_id: product_id.clone() }));
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64, discount_cents: Option<i64>) -> Product {
        let mut b = Product::builder(id, format!("Product {id}"), Money::usd(Decimal::new(cents, 2)));
        if let Some(d) = discount_cents { b = b.discount_price(Money::usd(Decimal::new(d, 2))); }
        b.build().unwrap()
    }

    fn qty(n: u32) -> Quantity { Quantity::new(n).unwrap() }

    #[test]
    fn test_add_existing_increments() {
        let a = product("1", 10000, Some(8000));
        let mut cart = CartLedger::new("USD");
        cart.add_item(&a, Quantity::ONE).unwrap();
        cart.add_item(&a, qty(2)).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity.value(), 3);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal().amount(), Decimal::new(240, 0));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = CartLedger::new("USD");
        for id in ["3", "1", "2"] { cart.add_item(&product(id, 100, None), Quantity::ONE).unwrap(); }
        cart.add_item(&product("1", 100, None), Quantity::ONE).unwrap();
        let order: Vec<_> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(order, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_set_quantity_below_one_is_rejected() {
        let mut cart = CartLedger::new("USD");
        cart.add_item(&product("1", 100, None), qty(3)).unwrap();
        let id = ProductId::from("1");
        assert_eq!(cart.set_quantity(&id, -1), Err(GuardRejection::QuantityBelowMinimum { requested: -1 }));
        assert_eq!(cart.set_quantity(&id, 0), Err(GuardRejection::QuantityBelowMinimum { requested: 0 }));
        assert_eq!(cart.line(&id).unwrap().quantity.value(), 3);
        cart.set_quantity(&id, 5).unwrap();
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_set_quantity_beyond_line_limit() {
        let mut cart = CartLedger::new("USD");
        cart.add_item(&product("1", 100, None), qty(2)).unwrap();
        let id = ProductId::from("1");
        assert_eq!(
            cart.set_quantity(&id, 5_000_000_000),
            Err(GuardRejection::QuantityTooLarge { requested: 5_000_000_000 })
        );
        assert_eq!(cart.item_count(), 2);
        cart.set_quantity(&id, i64::from(u32::MAX)).unwrap();
        assert_eq!(cart.item_count(), u64::from(u32::MAX));
    }

    #[test]
    fn test_set_quantity_on_missing_line() {
        let mut cart = CartLedger::new("USD");
        let id = ProductId::from("9");
        assert_eq!(cart.set_quantity(&id, 2), Err(GuardRejection::LineNotFound(id.clone())));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_item() {
        let mut cart = CartLedger::new("USD");
        cart.add_item(&product("1", 100, None), qty(2)).unwrap();
        cart.add_item(&product("2", 100, None), Quantity::ONE).unwrap();
        cart.remove_item(&ProductId::from("1")).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert!(cart.remove_item(&ProductId::from("1")).is_err());
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_subtotal_is_exact_sum() {
        let mut cart = CartLedger::new("USD");
        let hub = product("3", 12999, Some(9999));
        let headphones = product("1", 29999, Some(24999));
        cart.add_item(&headphones, Quantity::ONE).unwrap();
        cart.add_item(&hub, qty(2)).unwrap();
        let manual: Decimal = cart.lines().iter()
            .map(|l| Decimal::from(l.quantity.value()) * l.unit_price.amount())
            .sum();
        assert_eq!(cart.subtotal().amount(), manual);
        assert_eq!(cart.subtotal().display(), "$449.97");
    }

    #[test]
    fn test_repeated_cents_do_not_drift() {
        let mut cart = CartLedger::new("USD");
        let dime = product("d", 10, None);
        for _ in 0..1000 { cart.add_item(&dime, Quantity::ONE).unwrap(); }
        assert_eq!(cart.subtotal().amount(), Decimal::new(100, 0));
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let mut cart = CartLedger::new("EUR");
        let r = cart.add_item(&product("1", 100, None), Quantity::ONE);
        assert!(matches!(r, Err(GuardRejection::CurrencyMismatch { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_events_raised() {
        let mut cart = CartLedger::new("USD");
        cart.add_item(&product("1", 100, None), Quantity::ONE).unwrap();
        cart.set_quantity(&ProductId::from("1"), 4).unwrap();
        let _ = cart.set_quantity(&ProductId::from("1"), 0);
        cart.remove_item(&ProductId::from("1")).unwrap();
        let events = cart.take_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], DomainEvent::Cart(CartEvent::QuantityChanged { from: 1, to: 4, .. })));
        assert!(cart.take_events().is_empty());
    }
}
