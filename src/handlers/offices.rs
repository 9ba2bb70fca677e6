// src/handlers/offices.rs

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
    middleware::rbac::{PresidentOnly, RequireRole},
    models::office::{CreateOfficePayload, Office, UpdateOfficePayload},
};

pub async fn list_offices(State(app_state): State<AppState>) -> Result<Json<Vec<Office>>, AppError> {
    let offices = app_state.office_service.list_offices().await?;
    Ok(Json(offices))
}

pub async fn get_office(
    State(app_state): State<AppState>,
    Path(office_code): Path<String>,
) -> Result<Json<Office>, AppError> {
    let office = app_state.office_service.get_office(&office_code).await?;
    Ok(Json(office))
}

pub async fn create_office(
    State(app_state): State<AppState>,
    guard: RequireRole<PresidentOnly>,
    Json(payload): Json<CreateOfficePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let office = app_state.office_service.create_office(guard.principal(), &payload).await?;
    Ok((StatusCode::CREATED, Json(office)))
}

pub async fn update_office(
    State(app_state): State<AppState>,
    guard: RequireRole<PresidentOnly>,
    Path(office_code): Path<String>,
    Json(payload): Json<UpdateOfficePayload>,
) -> Result<Json<Office>, AppError> {
    payload.validate()?;

    let office = app_state
        .office_service
        .update_office(guard.principal(), &office_code, &payload)
        .await?;
    Ok(Json(office))
}

pub async fn delete_office(
    State(app_state): State<AppState>,
    guard: RequireRole<PresidentOnly>,
    Path(office_code): Path<String>,
) -> Result<StatusCode, AppError> {
    app_state.office_service.delete_office(guard.principal(), &office_code).await?;
    Ok(StatusCode::NO_CONTENT)
}
