//! Session cart and its priced view.
//!
//! The cart itself only records product ids and quantities. Prices are never
//! stored in it; [`CartView::build`] prices a cart against live catalog rows
//! each time it is shown.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use oliv_core::{Price, ProductId};

use super::Product;

/// One cart entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    /// Always at least 1; lines are removed rather than decremented to zero.
    pub quantity: u32,
}

/// Mapping from product id to quantity, kept in first-added order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add one unit of a product, creating the line if needed.
    pub fn add(&mut self, product_id: ProductId) {
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                product_id,
                quantity: 1,
            }),
        }
    }

    /// Drop a product's line. Returns whether a line was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.lines.iter().map(|l| l.product_id).collect()
    }
}

/// A cart line joined with its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
    /// `product.price × quantity`.
    pub subtotal: Price,
}

/// A cart priced against the current catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: Price,
}

impl CartView {
    /// Price `cart` using `products`.
    ///
    /// Lines whose product is not in `products` are left out silently, so a
    /// product deleted after it was added simply disappears from the cart.
    #[must_use]
    pub fn build(cart: &Cart, products: &[Product]) -> Self {
        let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();

        let lines: Vec<CartLineView> = cart
            .lines()
            .iter()
            .filter_map(|line| {
                let product = by_id.get(&line.product_id)?;
                Some(CartLineView {
                    product: (*product).clone(),
                    quantity: line.quantity,
                    subtotal: product.price.times(line.quantity),
                })
            })
            .collect();

        let total = lines.iter().map(|l| l.subtotal).sum();

        Self { lines, total }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Perfume {id}"),
            category: "Test".to_string(),
            price: Price::from_cents(cents).unwrap(),
            description: String::new(),
            image: "test.jpg".to_string(),
        }
    }

    #[test]
    fn test_add_increments_quantity() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(2));

        assert_eq!(
            cart.lines(),
            &[
                CartLine {
                    product_id: ProductId::new(1),
                    quantity: 2,
                },
                CartLine {
                    product_id: ProductId::new(2),
                    quantity: 1,
                },
            ]
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(2));

        assert!(cart.remove(ProductId::new(1)));
        let after_first = cart.clone();
        assert!(!cart.remove(ProductId::new(1)));
        assert_eq!(cart, after_first);
        assert_eq!(cart.product_ids(), vec![ProductId::new(2)]);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::default();
        for id in [3, 1, 2, 1] {
            cart.add(ProductId::new(id));
        }
        assert_eq!(
            cart.product_ids(),
            vec![ProductId::new(3), ProductId::new(1), ProductId::new(2)]
        );
    }

    #[test]
    fn test_view_subtotals_and_total() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(2));

        let view = CartView::build(&cart, &[product(1, 49_900), product(2, 54_900)]);

        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(view.lines[0].subtotal.to_string(), "998.00");
        assert_eq!(view.total.to_string(), "1547.00");
    }

    #[test]
    fn test_view_omits_missing_products() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(99));

        let view = CartView::build(&cart, &[product(1, 100)]);

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.total.cents(), 100);
    }

    #[test]
    fn test_empty_view() {
        let view = CartView::build(&Cart::default(), &[]);
        assert!(view.is_empty());
        assert_eq!(view.total, Price::ZERO);
    }

    #[test]
    fn test_cart_serializes_as_list() {
        let mut cart = Cart::default();
        cart.add(ProductId::new(4));
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json, r#"[{"product_id":4,"quantity":1}]"#);

        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
