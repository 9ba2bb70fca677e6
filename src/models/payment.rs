// src/models/payment.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::common::validation::{not_blank, positive_amount};

// Pagamentos pertencem ao cliente, não a um pedido específico
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub customer_number: i32,
    pub check_number: String,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentPayload {
    #[validate(
        length(min = 5, max = 50, message = "Informe um cheque/transação com pelo menos 5 caracteres."),
        custom(function = "not_blank")
    )]
    pub check_number: String,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
}
