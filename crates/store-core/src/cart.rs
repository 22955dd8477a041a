//! # Cart Ledger
//!
//! The authoritative in-memory record of cart contents and
//! checkout-adjacent selections (shipping address, payment method).
//!
//! The ledger is a per-session value mutated synchronously by discrete user
//! actions; it makes no durability guarantee of its own. The total is
//! recomputed from the items on every read and is never cached.

use crate::product::{Price, Product};
use serde::{Deserialize, Serialize};

/// A line item in the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID (unique key within the cart)
    pub product_id: String,

    /// Product name (denormalized for display)
    pub name: String,

    /// Unit price
    pub unit_price: Price,

    /// Quantity (always >= 1 while the item is present)
    pub quantity: u32,

    /// Optional image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartItem {
    /// Create a cart item from a product, with quantity 1
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price.clone(),
            quantity: 1,
            image_url: product.image_url.clone(),
        }
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> Price {
        Price {
            amount: self.unit_price.amount * self.quantity as i64,
            currency: self.unit_price.currency,
        }
    }
}

/// Selected payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment via the gateway
    Card,
    /// PayPal
    Paypal,
}

/// A structured shipping address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// The cart ledger: items plus checkout-adjacent selections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartLedger {
    /// Line items, in insertion order
    pub items: Vec<CartItem>,

    /// Shipping address, once the shipping step has been completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,

    /// Selected payment method, once chosen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    /// Whether a checkout is in progress (used to send a just-authenticated
    /// user to the shipping step instead of the storefront root)
    #[serde(default)]
    pub checking_out: bool,
}

impl CartLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product: existing items gain quantity, new products append.
    /// Insertion order is preserved for display.
    pub fn add_item(&mut self, product: &Product) {
        match self.find_mut(&product.id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem::from_product(product)),
        }
    }

    /// Increment an item's quantity. No-op if the item is absent.
    pub fn increment(&mut self, product_id: &str) {
        if let Some(item) = self.find_mut(product_id) {
            item.quantity += 1;
        }
    }

    /// Decrement an item's quantity, floored at 1. Never removes the item.
    pub fn decrement(&mut self, product_id: &str) {
        if let Some(item) = self.find_mut(product_id) {
            if item.quantity > 1 {
                item.quantity -= 1;
            }
        }
    }

    /// Remove an item regardless of quantity
    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|item| item.product_id != product_id);
    }

    /// Replace the shipping address
    pub fn set_shipping_address(&mut self, address: ShippingAddress) {
        self.shipping_address = Some(address);
    }

    /// Replace the payment method selection
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = Some(method);
    }

    /// Mark whether a checkout is in progress
    pub fn set_checking_out(&mut self, checking_out: bool) {
        self.checking_out = checking_out;
    }

    /// Return the ledger to its empty initial state
    /// (sign-out and order completion)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Cart total, recomputed from the items on every call
    pub fn total(&self) -> Price {
        let currency = self
            .items
            .first()
            .map(|item| item.unit_price.currency)
            .unwrap_or_default();
        let amount: i64 = self.items.iter().map(|item| item.total().amount).sum();
        Price { amount, currency }
    }

    /// Check if the cart has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total unit count across all items
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Look up an item by product ID
    pub fn get(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    fn find_mut(&mut self, product_id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|i| i.product_id == product_id)
    }
}
