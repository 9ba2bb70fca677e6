// src/handlers/orders.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedPrincipal,
        rbac::{RequireRole, StaffOnly},
    },
    models::order::{
        ItemRemovalResponse, Order, OrderDetail, OrderLine, OrderListQuery, UpdateCommentPayload,
        UpdateQuantityPayload,
    },
};

pub async fn list_orders(
    State(app_state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = app_state.order_service.list_orders(&principal, query.sort).await?;
    Ok(Json(orders))
}

pub async fn list_customer_orders(
    State(app_state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(customer_number): Path<i32>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = app_state
        .order_service
        .list_customer_orders(&principal, customer_number, query.sort)
        .await?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(app_state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(order_number): Path<i32>,
) -> Result<Json<OrderDetail>, AppError> {
    let detail = app_state.order_service.get_order_detail(&principal, order_number).await?;
    Ok(Json(detail))
}

pub async fn cancel_order(
    State(app_state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(order_number): Path<i32>,
) -> Result<StatusCode, AppError> {
    app_state.order_service.cancel_order(&principal, order_number).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_comment(
    State(app_state): State<AppState>,
    guard: RequireRole<StaffOnly>,
    Path(order_number): Path<i32>,
    Json(payload): Json<UpdateCommentPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    app_state
        .order_service
        .update_comment(guard.principal(), order_number, &payload.comment)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Itens do pedido ---

pub async fn update_item(
    State(app_state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(line_id): Path<i64>,
    Json(payload): Json<UpdateQuantityPayload>,
) -> Result<Json<OrderLine>, AppError> {
    payload.validate()?;

    let line = app_state
        .order_service
        .update_item_quantity(&principal, line_id, payload.quantity)
        .await?;
    Ok(Json(line))
}

pub async fn delete_item(
    State(app_state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(line_id): Path<i64>,
) -> Result<Json<ItemRemovalResponse>, AppError> {
    let (order_number, outcome) = app_state.order_service.delete_item(&principal, line_id).await?;
    Ok(Json(ItemRemovalResponse { order_number, outcome }))
}
