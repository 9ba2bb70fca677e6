// src/models/cart.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_code: String,
    pub product_name: String,
    pub quantity: i32,
    /// Preço congelado no momento em que o item entrou no carrinho.
    pub price_each: Decimal,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price_each * Decimal::from(self.quantity)
    }
}

/// Carrinho de uma sessão. A ordem de inserção vira a numeração
/// das linhas do pedido no checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, product_code: &str) -> i32 {
        self.items
            .iter()
            .find(|i| i.product_code == product_code)
            .map_or(0, |i| i.quantity)
    }

    /// Soma a quantidade se o produto já está no carrinho; o preço
    /// original é mantido. Retorna false (carrinho intacto) se a soma
    /// não cabe em um i32.
    pub fn add(&mut self, item: CartItem) -> bool {
        match self.items.iter_mut().find(|i| i.product_code == item.product_code) {
            Some(existing) => match existing.quantity.checked_add(item.quantity) {
                Some(total) => {
                    existing.quantity = total;
                    true
                }
                None => false,
            },
            None => {
                self.items.push(item);
                true
            }
        }
    }

    /// Quantidades abaixo de 1 viram 1. Retorna false se o item não existe.
    pub fn set_quantity(&mut self, product_code: &str, quantity: i32) -> bool {
        match self.items.iter_mut().find(|i| i.product_code == product_code) {
            Some(existing) => {
                existing.quantity = quantity.max(1);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, product_code: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_code != product_code);
        self.items.len() != before
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn view(&self) -> CartView {
        CartView {
            items: self.items.clone(),
            total: self.total(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: Decimal,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
    #[validate(length(min = 1, max = 15))]
    pub product_code: String,
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartPayload {
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CheckoutPayload {
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_number: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str, qty: i32, cents: i64) -> CartItem {
        CartItem {
            product_code: code.into(),
            product_name: format!("Produto {code}"),
            quantity: qty,
            price_each: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn adding_same_product_merges_quantity_and_keeps_first_price() {
        let mut cart = Cart::default();
        cart.add(item("S10_1678", 2, 95_70));
        cart.add(item("S10_1678", 3, 99_99));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of("S10_1678"), 5);
        assert_eq!(cart.items()[0].price_each, Decimal::new(95_70, 2));
    }

    #[test]
    fn overflowing_quantity_is_refused_and_cart_is_untouched() {
        let mut cart = Cart::default();
        assert!(cart.add(item("S10_1678", 1, 95_70)));
        assert!(!cart.add(item("S10_1678", i32::MAX, 95_70)));
        assert_eq!(cart.quantity_of("S10_1678"), 1);
        assert_eq!(cart.total(), Decimal::new(95_70, 2));
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut cart = Cart::default();
        cart.add(item("S24_3856", 1, 10_00));
        cart.add(item("S10_1949", 1, 20_00));
        cart.add(item("S12_1099", 1, 30_00));
        let codes: Vec<_> = cart.items().iter().map(|i| i.product_code.as_str()).collect();
        assert_eq!(codes, ["S24_3856", "S10_1949", "S12_1099"]);
    }

    #[test]
    fn quantity_update_is_clamped_to_one() {
        let mut cart = Cart::default();
        cart.add(item("S10_1678", 4, 1_00));
        assert!(cart.set_quantity("S10_1678", 0));
        assert_eq!(cart.quantity_of("S10_1678"), 1);
        assert!(!cart.set_quantity("S99_0000", 3));
    }

    #[test]
    fn remove_and_total() {
        let mut cart = Cart::default();
        cart.add(item("A", 2, 1_50));
        cart.add(item("B", 1, 2_25));
        assert_eq!(cart.total(), Decimal::new(5_25, 2));
        assert!(cart.remove("A"));
        assert!(!cart.remove("A"));
        assert_eq!(cart.total(), Decimal::new(2_25, 2));
    }
}
