// src/handlers/cart.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{CustomerOnly, RequireRole},
    models::cart::{AddToCartPayload, CartView, CheckoutPayload, CheckoutResponse, UpdateCartPayload},
};

pub async fn view_cart(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
) -> Result<Json<CartView>, AppError> {
    let cart = app_state.cart_service.view(guard.principal()).await?;
    Ok(Json(cart))
}

pub async fn add_item(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
    Json(payload): Json<AddToCartPayload>,
) -> Result<Json<CartView>, AppError> {
    payload.validate()?;

    let cart = app_state
        .cart_service
        .add(guard.principal(), payload.product_code.trim(), payload.quantity)
        .await?;
    Ok(Json(cart))
}

pub async fn update_item(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
    Path(product_code): Path<String>,
    Json(payload): Json<UpdateCartPayload>,
) -> Result<Json<CartView>, AppError> {
    let cart = app_state
        .cart_service
        .update(guard.principal(), &product_code, payload.quantity)
        .await?;
    Ok(Json(cart))
}

pub async fn remove_item(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
    Path(product_code): Path<String>,
) -> Result<Json<CartView>, AppError> {
    let cart = app_state.cart_service.remove(guard.principal(), &product_code).await?;
    Ok(Json(cart))
}

pub async fn checkout(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
    payload: Option<Json<CheckoutPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.unwrap_or_default();
    payload.validate()?;

    let order_number = app_state
        .cart_service
        .checkout(guard.principal(), payload.comment.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(CheckoutResponse { order_number })))
}
