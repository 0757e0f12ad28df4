//! In-memory shopping cart reducer.
//!
//! The cart is an insertion-ordered sequence of line items plus two cached
//! projections, `total` and `item_count`. The projections are never mutated
//! directly: every operation recomputes them from the item sequence, so they
//! cannot drift from the items they summarize.

use serde::{Deserialize, Serialize};

/// Catalog fields copied into the cart when a product is added.
///
/// This is a value snapshot, not a reference to the live product row; the
/// cart keeps whatever price the product had when the shopper added it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartProduct {
    pub product_id: i64,
    pub name: String,
    /// Unit price in whole currency units.
    pub price: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

/// One line of the cart: a product snapshot plus a quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub price: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
    /// Always >= 1; dropping below 1 removes the line instead.
    pub quantity: u32,
}

/// Transient per-session shopping cart.
///
/// No two items share a `product_id`: adding an existing product increments
/// its quantity rather than appending a duplicate line.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    items: Vec<CartItem>,
    total: i64,
    item_count: u32,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `product` to the cart.
    ///
    /// If the product is already present its quantity goes up by 1;
    /// otherwise a new line with quantity 1 is appended. Always succeeds.
    pub fn add(&mut self, product: CartProduct) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.product_id)
        {
            item.quantity += 1;
        } else {
            self.items.push(CartItem {
                product_id: product.product_id,
                name: product.name,
                price: product.price,
                image_url: product.image_url,
                category: product.category,
                quantity: 1,
            });
        }
        self.recalculate();
    }

    /// Sets the quantity of a line, removing it when `quantity` drops below 1.
    ///
    /// Unknown ids are a no-op: the drawer can fire stale updates after a
    /// line was already removed.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) {
        if quantity < 1 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            self.recalculate();
        }
    }

    /// Removes the matching line if present; no-op otherwise.
    pub fn remove(&mut self, product_id: i64) {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() != before {
            self.recalculate();
        }
    }

    /// Empties the cart. Invoked once per successful checkout.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recalculate();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of `price * quantity` over all lines, in whole currency units.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // Saturating sums: an absurd price must not wrap `total` negative.
    fn recalculate(&mut self) {
        self.total = self.items.iter().fold(0i64, |acc, i| {
            acc.saturating_add(i.price.saturating_mul(i64::from(i.quantity)))
        });
        self.item_count = self
            .items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity));
    }
}
