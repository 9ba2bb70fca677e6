// src/handlers/employees.rs

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
    middleware::rbac::{ManagerTier, RequireRole, StaffOnly},
    models::employee::{
        CreateEmployeePayload, CreateEmployeeResponse, CreateReportPayload, Dashboard, TerminationOutcome,
    },
};

pub async fn dashboard(
    State(app_state): State<AppState>,
    guard: RequireRole<StaffOnly>,
) -> Result<Json<Dashboard>, AppError> {
    let dashboard = app_state.employee_service.dashboard(guard.principal()).await?;
    Ok(Json(dashboard))
}

pub async fn create_employee(
    State(app_state): State<AppState>,
    guard: RequireRole<ManagerTier>,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let employee_number = app_state
        .employee_service
        .create_employee(guard.principal(), &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(CreateEmployeeResponse { employee_number })))
}

pub async fn terminate(
    State(app_state): State<AppState>,
    guard: RequireRole<ManagerTier>,
    Path(employee_number): Path<i32>,
) -> Result<Json<TerminationOutcome>, AppError> {
    let outcome = app_state
        .account_service
        .terminate_sales_rep(guard.principal(), employee_number)
        .await?;
    Ok(Json(outcome))
}

pub async fn create_report(
    State(app_state): State<AppState>,
    guard: RequireRole<StaffOnly>,
    Json(payload): Json<CreateReportPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let report = app_state
        .employee_service
        .create_report(guard.principal(), &payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}
