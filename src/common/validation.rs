// src/common/validation.rs

// Validadores customizados usados nos payloads (`#[validate(custom(...))]`).

use rust_decimal::Decimal;
use validator::ValidationError;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "O campo não pode ficar em branco."));
    }
    Ok(())
}

// Dígitos, '-', '+' e espaço; de 6 a 20 caracteres.
pub fn phone_number(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | ' '));

    if !(6..=20).contains(&len) || !allowed {
        return Err(invalid("phone", "Formato de telefone inválido."));
    }
    Ok(())
}

pub fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(invalid("positive", "O valor deve ser positivo."));
    }
    Ok(())
}
