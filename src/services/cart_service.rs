// src/services/cart_service.rs

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::{
        auth::Principal,
        cart::{Cart, CartItem, CartView},
    },
    services::OrderService,
};

/// Carrinhos em memória, um por sessão (o `sid` do token).
#[derive(Clone, Default)]
pub struct CartStore {
    carts: Arc<RwLock<HashMap<Uuid, Cart>>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, session_id: Uuid) -> Cart {
        self.carts.read().await.get(&session_id).cloned().unwrap_or_default()
    }

    /// Aplica `f` ao carrinho da sessão sob o lock de escrita.
    pub async fn update<T>(&self, session_id: Uuid, f: impl FnOnce(&mut Cart) -> T) -> T {
        let mut carts = self.carts.write().await;
        let cart = carts.entry(session_id).or_default();
        let result = f(cart);
        if cart.is_empty() {
            carts.remove(&session_id);
        }
        result
    }

    pub async fn clear(&self, session_id: Uuid) {
        self.carts.write().await.remove(&session_id);
    }
}

fn ensure_customer(principal: &Principal) -> Result<i32, AppError> {
    principal
        .customer_id()
        .ok_or_else(|| AppError::Forbidden("Somente clientes usam o carrinho.".into()))
}

fn not_in_cart(product_code: &str) -> AppError {
    AppError::NotFound(format!("O produto '{product_code}' não está no carrinho."))
}

#[derive(Clone)]
pub struct CartService {
    store: CartStore,
    product_repo: ProductRepository,
    order_service: OrderService,
}

impl CartService {
    pub fn new(store: CartStore, product_repo: ProductRepository, order_service: OrderService) -> Self {
        Self {
            store,
            product_repo,
            order_service,
        }
    }

    pub async fn view(&self, principal: &Principal) -> Result<CartView, AppError> {
        ensure_customer(principal)?;
        Ok(self.store.get(principal.session_id).await.view())
    }

    /// Adiciona ao carrinho com o preço de tabela (MSRP) do momento. A
    /// quantidade acumulada não pode passar do estoque.
    pub async fn add(&self, principal: &Principal, product_code: &str, quantity: i32) -> Result<CartView, AppError> {
        ensure_customer(principal)?;
        if quantity < 1 {
            return Err(AppError::InvalidInput("A quantidade deve ser no mínimo 1.".into()));
        }

        let product = self
            .product_repo
            .find(product_code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Produto '{product_code}' não encontrado.")))?;

        self.store
            .update(principal.session_id, |cart| {
                let out_of_stock = || {
                    AppError::InvalidInput(format!(
                        "Estoque insuficiente para '{}' (disponível: {}).",
                        product.product_name, product.quantity_in_stock
                    ))
                };
                let wanted = cart
                    .quantity_of(&product.product_code)
                    .checked_add(quantity)
                    .ok_or_else(out_of_stock)?;
                if wanted > product.quantity_in_stock {
                    return Err(out_of_stock());
                }
                let added = cart.add(CartItem {
                    product_code: product.product_code.clone(),
                    product_name: product.product_name.clone(),
                    quantity,
                    price_each: product.msrp,
                });
                if !added {
                    return Err(out_of_stock());
                }
                Ok(cart.view())
            })
            .await
    }

    /// Quantidades abaixo de 1 são tratadas como 1.
    pub async fn update(&self, principal: &Principal, product_code: &str, quantity: i32) -> Result<CartView, AppError> {
        ensure_customer(principal)?;
        self.store
            .update(principal.session_id, |cart| {
                if !cart.set_quantity(product_code, quantity) {
                    return Err(not_in_cart(product_code));
                }
                Ok(cart.view())
            })
            .await
    }

    pub async fn remove(&self, principal: &Principal, product_code: &str) -> Result<CartView, AppError> {
        ensure_customer(principal)?;
        self.store
            .update(principal.session_id, |cart| {
                if !cart.remove(product_code) {
                    return Err(not_in_cart(product_code));
                }
                Ok(cart.view())
            })
            .await
    }

    /// Vira pedido. O carrinho só é esvaziado se o pedido for gravado.
    pub async fn checkout(&self, principal: &Principal, comment: Option<&str>) -> Result<i32, AppError> {
        let customer_number = ensure_customer(principal)?;
        let cart = self.store.get(principal.session_id).await;

        let order_number = self
            .order_service
            .create_order(customer_number, cart.items(), comment)
            .await?;

        self.store.clear(principal.session_id).await;
        Ok(order_number)
    }
}
