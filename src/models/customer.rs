// src/models/customer.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::common::validation::{not_blank, phone_number};
use crate::models::payment::Payment;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_number: i32,
    pub customer_name: String,
    pub contact_last_name: String,
    pub contact_first_name: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub sales_rep_employee_number: Option<i32>,
    pub credit_limit: Option<Decimal>,
}

// --- SALDO ---

/// Saldo = pedidos não cancelados - pagamentos. Sempre decimal exato.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub total_orders: Decimal,
    pub total_payments: Decimal,
    pub balance: Decimal,
}

impl BalanceSummary {
    pub fn from_totals(total_orders: Decimal, total_payments: Decimal) -> Self {
        Self {
            total_orders,
            total_payments,
            balance: total_orders - total_payments,
        }
    }

    pub fn has_debt(&self) -> bool {
        self.balance > Decimal::ZERO
    }
}

// Linha do cálculo em lote (listas de clientes do gerente / do Sales Rep)
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBalanceRow {
    pub customer_number: i32,
    pub customer_name: String,
    pub city: String,
    pub country: String,
    pub total_orders: Decimal,
    pub total_payments: Decimal,
    pub balance: Decimal,
}

impl CustomerBalanceRow {
    pub fn summary(&self) -> BalanceSummary {
        BalanceSummary::from_totals(self.total_orders, self.total_payments)
    }
}

// Página "minha conta": perfil + saldo + histórico de pagamentos
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub customer: Customer,
    pub balance: BalanceSummary,
    pub payments: Vec<Payment>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[validate(
        length(min = 2, max = 50, message = "O nome deve ter entre 2 e 50 caracteres."),
        custom(function = "not_blank")
    )]
    pub contact_first_name: String,
    #[validate(
        length(min = 2, max = 50, message = "O sobrenome deve ter entre 2 e 50 caracteres."),
        custom(function = "not_blank")
    )]
    pub contact_last_name: String,
    #[validate(length(max = 50, message = "Máximo de 50 caracteres."), custom(function = "not_blank"))]
    pub customer_name: String,
    #[validate(custom(function = "phone_number"))]
    pub phone: String,
    #[validate(length(max = 50, message = "Máximo de 50 caracteres."), custom(function = "not_blank"))]
    pub address_line1: String,
    #[validate(length(max = 50, message = "Máximo de 50 caracteres."), custom(function = "not_blank"))]
    pub city: String,
    #[validate(length(max = 50, message = "Máximo de 50 caracteres."), custom(function = "not_blank"))]
    pub country: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 2, max = 50, message = "O nome deve ter entre 2 e 50 caracteres."), custom(function = "not_blank"))]
    pub contact_first_name: String,
    #[validate(length(min = 2, max = 50, message = "O sobrenome deve ter entre 2 e 50 caracteres."), custom(function = "not_blank"))]
    pub contact_last_name: String,
    #[validate(custom(function = "phone_number"))]
    pub phone: String,
    #[validate(length(max = 50, message = "Máximo de 50 caracteres."), custom(function = "not_blank"))]
    pub address_line1: String,
    #[validate(length(max = 50, message = "Máximo de 50 caracteres."), custom(function = "not_blank"))]
    pub city: String,
    #[validate(length(max = 50, message = "Máximo de 50 caracteres."), custom(function = "not_blank"))]
    pub country: String,
}

// Exclusão da conta: senha de novo + caixa de confirmação marcada
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountPayload {
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionEligibility {
    pub eligible: bool,
    pub balance: BalanceSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub customer_number: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupPayload {
        SignupPayload {
            contact_first_name: "Jean".into(),
            contact_last_name: "King".into(),
            customer_name: "Atelier graphique".into(),
            phone: "40 32 2555".into(),
            address_line1: "54, rue Royale".into(),
            city: "Nantes".into(),
            country: "France".into(),
            password: "secret1".into(),
        }
    }

    #[test]
    fn balance_is_orders_minus_payments() {
        let summary = BalanceSummary::from_totals(Decimal::new(1_000_50, 2), Decimal::new(400_25, 2));
        assert_eq!(summary.balance, Decimal::new(600_25, 2));
        assert!(summary.has_debt());
    }

    #[test]
    fn empty_history_has_zero_balance_and_no_debt() {
        let summary = BalanceSummary::from_totals(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(summary.balance, Decimal::ZERO);
        assert!(!summary.has_debt());
    }

    #[test]
    fn overpayment_is_not_debt() {
        let summary = BalanceSummary::from_totals(Decimal::new(100, 0), Decimal::new(150, 0));
        assert_eq!(summary.balance, Decimal::new(-50, 0));
        assert!(!summary.has_debt());
    }

    #[test]
    fn valid_signup_passes() {
        assert!(signup().validate().is_ok());
    }

    #[test]
    fn signup_rejects_short_names_and_weak_password() {
        let mut payload = signup();
        payload.contact_first_name = "J".into();
        payload.password = "123".into();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("contact_first_name"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn signup_rejects_blank_city() {
        let mut payload = signup();
        payload.city = "   ".into();
        assert!(payload.validate().unwrap_err().field_errors().contains_key("city"));
    }
}
