// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedPrincipal,
    models::auth::{AuthResponse, ChangePasswordPayload, LoginPayload, Profile},
};

// Handler de login (cliente ou funcionário)
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let response = app_state.auth_service.login(&payload).await?;
    Ok(Json(response))
}

pub async fn logout(
    State(app_state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
) -> StatusCode {
    app_state.auth_service.logout(&principal).await;
    StatusCode::NO_CONTENT
}

pub async fn change_password(
    State(app_state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    app_state.auth_service.change_password(&principal, &payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Handler da rota protegida /me
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
) -> Result<Json<Profile>, AppError> {
    let profile = app_state.auth_service.current_profile(&principal).await?;
    Ok(Json(profile))
}
