// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::models::order::OrderStatus;

// Taxonomia: validação (400), autenticação (401), autorização (403),
// integridade (404/409) e falhas do banco (500, nunca expostas ao cliente).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("Não encontrado: {0}")]
    NotFound(String),

    #[error("Conflito: {0}")]
    Conflict(String),

    #[error("Violação de integridade: {0}")]
    IntegrityViolation(String),

    #[error("Pedido {order_number} não pode ser alterado (status: {status})")]
    OrderNotEditable {
        order_number: i32,
        status: OrderStatus,
    },

    #[error("Saldo devedor em aberto: {0}")]
    OutstandingBalance(Decimal),

    #[error("Nenhum outro Sales Rep no escritório {office_code} para assumir a carteira")]
    NoReplacementRep { office_code: String },

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_)
            | AppError::IntegrityViolation(_)
            | AppError::OrderNotEditable { .. }
            | AppError::OutstandingBalance(_)
            | AppError::NoReplacementRep { .. } => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Achata os erros do validator em { campo: [mensagens] }. Structs aninhadas
// (payloads com #[serde(flatten)]) entram com os nomes dos próprios campos.
fn collect_details(errors: &ValidationErrors, details: &mut HashMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                });
                details.entry(field.to_string()).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(nested) => collect_details(nested, details),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_details(nested, details);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                collect_details(&errors, &mut details);
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidCredentials => "Número ou senha inválidos.".to_string(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),

            // O erro cru do banco vai para o log, o cliente recebe só a mensagem genérica.
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
            e => e.to_string(),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_failures_map_to_client_statuses() {
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NoReplacementRep { office_code: "1".into() }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::OrderNotEditable {
                order_number: 10100,
                status: OrderStatus::Shipped
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn store_errors_are_reported_as_generic_500() {
        let response = AppError::DatabaseError(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn schema_level_errors_show_up_in_details() {
        let mut errors = ValidationErrors::new();
        errors.add("__all__", validator::ValidationError::new("msrp_below_buy_price"));
        let mut details = HashMap::new();
        collect_details(&errors, &mut details);
        assert_eq!(details["__all__"], vec!["msrp_below_buy_price".to_string()]);
    }

    #[test]
    fn no_replacement_message_names_the_office() {
        let err = AppError::NoReplacementRep { office_code: "4".into() };
        assert!(err.to_string().contains("escritório 4"));
    }
}
