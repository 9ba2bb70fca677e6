// src/handlers/customers.rs

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
    middleware::rbac::{CustomerOnly, ManagerTier, RequireRole, StaffOnly},
    models::{
        customer::{
            BalanceSummary, Customer, CustomerBalanceRow, CustomerProfile, DeleteAccountPayload,
            DeletionEligibility, SignupPayload, SignupResponse, UpdateProfilePayload,
        },
        payment::{NewPaymentPayload, Payment},
    },
};

// Cadastro público
pub async fn signup(
    State(app_state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer_number = app_state.customer_service.signup(&payload).await?;
    Ok((StatusCode::CREATED, Json(SignupResponse { customer_number })))
}

// --- Minha conta ---

pub async fn get_my_profile(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
) -> Result<Json<CustomerProfile>, AppError> {
    let profile = app_state.customer_service.get_profile(guard.principal().id).await?;
    Ok(Json(profile))
}

pub async fn update_my_profile(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<Customer>, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .update_profile(guard.principal().id, &payload)
        .await?;
    Ok(Json(customer))
}

pub async fn get_my_balance(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
) -> Result<Json<BalanceSummary>, AppError> {
    let profile = app_state.customer_service.get_profile(guard.principal().id).await?;
    Ok(Json(profile.balance))
}

pub async fn get_deletion_eligibility(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
) -> Result<Json<DeletionEligibility>, AppError> {
    let eligibility = app_state
        .account_service
        .deletion_eligibility(guard.principal().id)
        .await?;
    Ok(Json(eligibility))
}

pub async fn delete_my_account(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
    Json(payload): Json<DeleteAccountPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    let principal = guard.principal();

    app_state
        .account_service
        .delete_customer(principal, principal.id, &payload.password, payload.confirm)
        .await?;
    app_state.auth_service.logout(principal).await;

    Ok(StatusCode::NO_CONTENT)
}

// --- Pagamentos ---

pub async fn record_payment(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
    Json(payload): Json<NewPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let payment = app_state
        .customer_service
        .record_payment(guard.principal().id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn list_payments(
    State(app_state): State<AppState>,
    guard: RequireRole<CustomerOnly>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let payments = app_state.customer_service.list_payments(guard.principal().id).await?;
    Ok(Json(payments))
}

// --- Visão da equipe ---

pub async fn list_customers(
    State(app_state): State<AppState>,
    guard: RequireRole<ManagerTier>,
) -> Result<Json<Vec<CustomerBalanceRow>>, AppError> {
    let customers = app_state
        .customer_service
        .list_customers_with_balances(guard.principal())
        .await?;
    Ok(Json(customers))
}

pub async fn get_customer(
    State(app_state): State<AppState>,
    guard: RequireRole<StaffOnly>,
    Path(customer_number): Path<i32>,
) -> Result<Json<CustomerProfile>, AppError> {
    let profile = app_state
        .customer_service
        .get_customer(guard.principal(), customer_number)
        .await?;
    Ok(Json(profile))
}
