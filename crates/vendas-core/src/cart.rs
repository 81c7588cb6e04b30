//! # Cart
//!
//! The in-memory ordered collection of selected sale lines before
//! submission.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Composer Action          Cart Method             Cart State Change     │
//! │  ───────────────          ───────────             ─────────────────     │
//! │                                                                         │
//! │  AddLine ────────────────► add() ───────────────► push or merge qty    │
//! │                                                                         │
//! │  SetLineQuantity ────────► set_quantity() ──────► lines[i].qty = max(1)│
//! │                                                                         │
//! │  RemoveLine ─────────────► remove() ────────────► retain(id != x)      │
//! │                                                                         │
//! │  Submit success/Cancel ──► clear() ─────────────► lines.clear()        │
//! │                                                                         │
//! │  ComputeTotal ───────────► total() ─────────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::validation::{validate_quantity, validate_stock, ValidationResult};

/// A line in the cart.
///
/// ## Design Notes
/// `name` and `unit_price` are frozen when the line is first added. If the
/// product changes on the backend later, the cart still shows and charges
/// what the user saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedLine {
    pub product_id: ProductId,

    /// Product name at time of adding (frozen)
    pub name: String,

    /// Price in centavos at time of adding (frozen)
    pub unit_price: Money,

    /// Always >= 1
    pub quantity: i64,
}

impl SelectedLine {
    /// Creates a line from a catalog product, freezing name and price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        SelectedLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges)
/// - Insertion order is display order
/// - Every quantity is >= 1
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<SelectedLine>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    ///
    /// ## Behavior
    /// - Product already in cart: increments its quantity
    /// - Product not in cart: appends a new line with frozen name/price
    ///
    /// The cumulative quantity is checked against the product's snapshot
    /// stock, and the cart total must stay representable. On error the
    /// cart is unchanged.
    pub fn add(&mut self, product: &Product, quantity: i64) -> ValidationResult<()> {
        validate_quantity(quantity)?;

        if let Some(index) = self.position(product.id) {
            let previous = self.lines[index].quantity;
            let cumulative = previous
                .checked_add(quantity)
                .ok_or(ValidationError::InsufficientStock {
                    product_id: product.id,
                    available: product.stock_quantity,
                    requested: i64::MAX,
                })?;
            validate_stock(product, cumulative)?;
            self.lines[index].quantity = cumulative;
            if self.checked_total().is_none() {
                self.lines[index].quantity = previous;
                return Err(ValidationError::AmountTooLarge);
            }
            return Ok(());
        }

        validate_stock(product, quantity)?;
        self.lines.push(SelectedLine::from_product(product, quantity));
        if self.checked_total().is_none() {
            self.lines.pop();
            return Err(ValidationError::AmountTooLarge);
        }
        Ok(())
    }

    /// Appends a line as-is (used to rebuild a cart from unsent lines).
    ///
    /// Merges with an existing line for the same product.
    pub fn restore(&mut self, line: SelectedLine) {
        match self.lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }

    /// Sets a line's quantity, clamped to a minimum of 1.
    ///
    /// Stock is not re-checked here; submission re-validates. Returns
    /// `Ok(false)` if the product is not in the cart, and
    /// `AmountTooLarge` (cart unchanged) if the total would overflow.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> ValidationResult<bool> {
        let Some(index) = self.position(product_id) else {
            return Ok(false);
        };

        let previous = self.lines[index].quantity;
        self.lines[index].quantity = quantity.max(1);
        if self.checked_total().is_none() {
            self.lines[index].quantity = previous;
            return Err(ValidationError::AmountTooLarge);
        }
        Ok(true)
    }

    /// Removes a line. Absent ids are a no-op; returns whether a line was
    /// removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != initial_len
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[SelectedLine] {
        &self.lines
    }

    pub fn line(&self, product_id: ProductId) -> Option<&SelectedLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of `unit_price × quantity` over all lines. Exact, since `add`
    /// and `set_quantity` keep [`Cart::checked_total`] representable.
    pub fn total(&self) -> Money {
        self.lines.iter().map(SelectedLine::line_total).sum()
    }

    /// Exact total, or `None` if it does not fit in `i64` centavos.
    pub fn checked_total(&self) -> Option<Money> {
        self.lines.iter().try_fold(Money::zero(), |acc, line| {
            acc.checked_add(line.unit_price.checked_mul_quantity(line.quantity)?)
        })
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }
}

/// Cart totals summary for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.len(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: ProductId, price_cents: i64, stock: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: None,
            unit_price: Money::from_cents(price_cents),
            stock_quantity: stock,
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        let product = test_product(1, 999, 10);

        cart.add(&product, 2).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total().cents(), 1998);
    }

    #[test]
    fn test_cart_add_same_product_merges() {
        let mut cart = Cart::new();
        let product = test_product(1, 999, 10);

        cart.add(&product, 2).unwrap();
        cart.add(&product, 3).unwrap();
        cart.add(&product, 1).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(1).unwrap().quantity, 6);
    }

    #[test]
    fn test_cart_rejects_cumulative_overflow_of_stock() {
        let mut cart = Cart::new();
        let product = test_product(1, 1000, 5);

        cart.add(&product, 3).unwrap();
        let before = cart.clone();

        let err = cart.add(&product, 3).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientStock {
                product_id: 1,
                available: 5,
                requested: 6
            }
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_cart_rejects_first_add_above_stock() {
        let mut cart = Cart::new();
        assert!(cart.add(&test_product(1, 1000, 2), 3).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        let product = test_product(1, 1000, 5);
        assert_eq!(cart.add(&product, 0), Err(ValidationError::SelectionRequired));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&test_product(3, 100, 9), 1).unwrap();
        cart.add(&test_product(1, 100, 9), 1).unwrap();
        cart.add(&test_product(3, 100, 9), 1).unwrap();

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_set_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 100, 9), 4).unwrap();

        assert_eq!(cart.set_quantity(1, 0), Ok(true));
        assert_eq!(cart.line(1).unwrap().quantity, 1);
        assert_eq!(cart.set_quantity(1, -7), Ok(true));
        assert_eq!(cart.line(1).unwrap().quantity, 1);
        // no stock check at this point
        assert_eq!(cart.set_quantity(1, 50), Ok(true));
        assert_eq!(cart.line(1).unwrap().quantity, 50);
        assert_eq!(cart.set_quantity(2, 3), Ok(false));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 250, 9), 2).unwrap();
        let total = cart.total();

        assert!(!cart.remove(42));
        assert_eq!(cart.total(), total);
        assert!(cart.remove(1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_invariant_under_remove_then_readd() {
        let mut cart = Cart::new();
        let a = test_product(1, 1099, 9);
        let b = test_product(2, 550, 9);
        cart.add(&a, 2).unwrap();
        cart.add(&b, 4).unwrap();
        let total = cart.total();

        cart.remove(1);
        cart.add(&a, 2).unwrap();
        assert_eq!(cart.total(), total);
    }

    #[test]
    fn test_frozen_snapshot() {
        let mut cart = Cart::new();
        let mut product = test_product(1, 1000, 9);
        cart.add(&product, 1).unwrap();

        product.unit_price = Money::from_cents(2000);
        product.name = "Renamed".to_string();
        cart.add(&product, 1).unwrap();

        let line = cart.line(1).unwrap();
        assert_eq!(line.unit_price.cents(), 1000);
        assert_eq!(line.name, "Product 1");
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_set_quantity_rejects_overflowing_total() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 1000, 9), 2).unwrap();

        assert_eq!(
            cart.set_quantity(1, i64::MAX / 10),
            Err(ValidationError::AmountTooLarge)
        );
        assert_eq!(cart.line(1).unwrap().quantity, 2);
        assert_eq!(cart.total().cents(), 2000);
        assert_eq!(cart.checked_total(), Some(Money::from_cents(2000)));
    }

    #[test]
    fn test_add_rejects_overflowing_total() {
        let mut cart = Cart::new();
        let pricey = test_product(1, i64::MAX / 2, i64::MAX);
        cart.add(&pricey, 1).unwrap();

        assert_eq!(cart.add(&pricey, 2), Err(ValidationError::AmountTooLarge));
        assert_eq!(cart.line(1).unwrap().quantity, 1);

        let other = test_product(2, i64::MAX / 2 + 10, 9);
        assert_eq!(cart.add(&other, 1), Err(ValidationError::AmountTooLarge));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total().cents(), i64::MAX / 2);
    }

    #[test]
    fn test_restore_merges() {
        let mut cart = Cart::new();
        let product = test_product(1, 100, 9);
        cart.restore(SelectedLine::from_product(&product, 2));
        cart.restore(SelectedLine::from_product(&product, 1));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_cart_totals() {
        let mut cart = Cart::new();
        cart.add(&test_product(1, 1000, 9), 3).unwrap();
        cart.add(&test_product(2, 550, 9), 4).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_quantity, 7);
        assert_eq!(totals.total.cents(), 5200);
    }
}
