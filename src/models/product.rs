// src/models/product.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::common::validation::{not_blank, positive_amount};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductLine {
    pub product_line: String,
    pub text_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_code: String,
    pub product_name: String,
    pub product_line: String,
    pub product_scale: String,
    pub product_vendor: String,
    pub product_description: String,
    pub quantity_in_stock: i32,
    pub buy_price: Decimal,
    pub msrp: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
    Popular,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub sort: ProductSort,
}

// --- PAYLOADS ---

/// Campos editáveis de um produto (o código só entra na criação).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "msrp_not_below_buy_price"))]
pub struct ProductFields {
    #[validate(length(min = 1, max = 70, message = "Nome com até 70 caracteres."), custom(function = "not_blank"))]
    pub product_name: String,
    #[validate(length(min = 1, max = 50, message = "Linha com até 50 caracteres."), custom(function = "not_blank"))]
    pub product_line: String,
    #[validate(length(min = 1, max = 10, message = "Escala com até 10 caracteres."), custom(function = "not_blank"))]
    pub product_scale: String,
    #[validate(length(min = 1, max = 50, message = "Fornecedor com até 50 caracteres."), custom(function = "not_blank"))]
    pub product_vendor: String,
    #[validate(length(min = 1, message = "A descrição é obrigatória."), custom(function = "not_blank"))]
    pub product_description: String,
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub quantity_in_stock: i32,
    #[validate(custom(function = "positive_amount"))]
    pub buy_price: Decimal,
    #[validate(custom(function = "positive_amount"))]
    pub msrp: Decimal,
}

fn msrp_not_below_buy_price(fields: &ProductFields) -> Result<(), ValidationError> {
    if fields.msrp < fields.buy_price {
        return Err(ValidationError::new("msrp_below_buy_price")
            .with_message("O MSRP não pode ser menor que o preço de compra.".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, max = 15, message = "Código com até 15 caracteres."), custom(function = "not_blank"))]
    pub product_code: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: ProductFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ProductFields {
        ProductFields {
            product_name: "1969 Harley Davidson Ultimate Chopper".into(),
            product_line: "Motorcycles".into(),
            product_scale: "1:10".into(),
            product_vendor: "Min Lin Diecast".into(),
            product_description: "Detailed replica".into(),
            quantity_in_stock: 7933,
            buy_price: Decimal::new(48_81, 2),
            msrp: Decimal::new(95_70, 2),
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(fields().validate().is_ok());
    }

    #[test]
    fn msrp_below_buy_price_is_rejected() {
        let mut f = fields();
        f.msrp = Decimal::new(10_00, 2);
        let errors = f.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn negative_stock_and_long_code_are_rejected() {
        let mut f = fields();
        f.quantity_in_stock = -1;
        let payload = CreateProductPayload {
            product_code: "S18_3232_TOO_LONG_CODE".into(),
            fields: f,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("product_code"));
        assert!(errors.errors().contains_key("fields"));
    }
}
