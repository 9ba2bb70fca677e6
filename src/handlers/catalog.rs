// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{RequireRole, StaffOnly},
    models::{
        product::{CreateProductPayload, Product, ProductFields, ProductLine, ProductListQuery},
        report::PopularProduct,
    },
};

// --- Vitrine (pública) ---

pub async fn list_product_lines(State(app_state): State<AppState>) -> Result<Json<Vec<ProductLine>>, AppError> {
    let lines = app_state.catalog_service.list_product_lines().await?;
    Ok(Json(lines))
}

pub async fn products_by_line(
    State(app_state): State<AppState>,
    Path(product_line): Path<String>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = app_state
        .catalog_service
        .products_by_line(&product_line, query.sort)
        .await?;
    Ok(Json(products))
}

pub async fn popular_products(
    State(app_state): State<AppState>,
    Path(product_line): Path<String>,
) -> Json<Vec<PopularProduct>> {
    Json(app_state.report_service.popular_products(&product_line).await)
}

pub async fn get_product(
    State(app_state): State<AppState>,
    Path(product_code): Path<String>,
) -> Result<Json<Product>, AppError> {
    let product = app_state.catalog_service.get_product(&product_code).await?;
    Ok(Json(product))
}

// --- Administração (equipe) ---

pub async fn list_products(
    State(app_state): State<AppState>,
    _guard: RequireRole<StaffOnly>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = app_state.catalog_service.list_products().await?;
    Ok(Json(products))
}

pub async fn create_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<StaffOnly>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.catalog_service.create_product(&payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<StaffOnly>,
    Path(product_code): Path<String>,
    Json(payload): Json<ProductFields>,
) -> Result<Json<Product>, AppError> {
    payload.validate()?;

    let product = app_state.catalog_service.update_product(&product_code, &payload).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<StaffOnly>,
    Path(product_code): Path<String>,
) -> Result<StatusCode, AppError> {
    app_state.catalog_service.delete_product(&product_code).await?;
    Ok(StatusCode::NO_CONTENT)
}
