// src/models/office.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::common::validation::not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    pub office_code: String,
    pub city: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub postal_code: String,
    pub territory: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfficePayload {
    #[validate(length(min = 1, max = 10, message = "Código com até 10 caracteres."), custom(function = "not_blank"))]
    pub office_code: String,
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub city: String,
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub phone: String,
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub address_line1: String,
    #[validate(length(max = 50))]
    pub address_line2: Option<String>,
    #[validate(length(max = 50))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub country: String,
    #[validate(length(min = 1, max = 15), custom(function = "not_blank"))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 10), custom(function = "not_blank"))]
    pub territory: String,
}

// Código, cidade e país não mudam depois de criados
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfficePayload {
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub phone: String,
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub address_line1: String,
    #[validate(length(max = 50))]
    pub address_line2: Option<String>,
    #[validate(length(max = 50))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 15), custom(function = "not_blank"))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 10), custom(function = "not_blank"))]
    pub territory: String,
}
