// src/db/product_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{is_check_violation, is_foreign_key_violation, is_unique_violation},
        error::AppError,
    },
    models::product::{CreateProductPayload, Product, ProductFields, ProductLine, ProductSort},
};

const PRODUCT_COLUMNS: &str = r#"
    p.product_code, p.product_name, p.product_line, p.product_scale, p.product_vendor,
    p.product_description, p.quantity_in_stock, p.buy_price, p.msrp
"#;

// Unidades vendidas por produto, só pedidos não cancelados
const UNITS_SOLD_JOIN: &str = r#"
    LEFT JOIN (
        SELECT d.product_code, SUM(d.quantity_ordered)::BIGINT AS units_sold
        FROM order_details d
        JOIN orders o ON o.order_number = d.order_number
        WHERE o.status <> 'Cancelled'
        GROUP BY d.product_code
    ) sold ON sold.product_code = p.product_code
"#;

fn order_by(sort: ProductSort) -> &'static str {
    match sort {
        ProductSort::Name => "p.product_name ASC",
        ProductSort::PriceAsc => "p.msrp ASC, p.product_name ASC",
        ProductSort::PriceDesc => "p.msrp DESC, p.product_name ASC",
        ProductSort::Popular => "COALESCE(sold.units_sold, 0) DESC, p.product_name ASC",
    }
}

// Traduz as violações de integridade da escrita de um produto
fn map_write_error(e: sqlx::Error, product_code: &str) -> AppError {
    if is_unique_violation(&e) {
        return AppError::Conflict(format!("O produto '{product_code}' já existe."));
    }
    if is_foreign_key_violation(&e) {
        return AppError::InvalidInput("A linha de produto informada não existe.".into());
    }
    if is_check_violation(&e) {
        return AppError::InvalidInput("Preços ou estoque inválidos para o produto.".into());
    }
    e.into()
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LINHAS DE PRODUTO
    // =========================================================================

    pub async fn list_lines(&self) -> Result<Vec<ProductLine>, AppError> {
        let lines = sqlx::query_as::<_, ProductLine>(
            "SELECT product_line, text_description FROM product_lines ORDER BY product_line",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    pub async fn line_exists(&self, product_line: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM product_lines WHERE product_line = $1)",
        )
        .bind(product_line)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p ORDER BY p.product_line, p.product_name");
        let products = sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?;
        Ok(products)
    }

    pub async fn list_by_line(&self, product_line: &str, sort: ProductSort) -> Result<Vec<Product>, AppError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p {UNITS_SOLD_JOIN} WHERE p.product_line = $1 ORDER BY {}",
            order_by(sort)
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(product_line)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find(&self, product_code: &str) -> Result<Option<Product>, AppError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.product_code = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(product_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn insert(&self, payload: &CreateProductPayload) -> Result<Product, AppError> {
        let code = payload.product_code.trim();
        let f = &payload.fields;
        let sql = format!(
            r#"
            INSERT INTO products AS p (
                product_code, product_name, product_line, product_scale, product_vendor,
                product_description, quantity_in_stock, buy_price, msrp
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(code)
            .bind(f.product_name.trim())
            .bind(f.product_line.trim())
            .bind(f.product_scale.trim())
            .bind(f.product_vendor.trim())
            .bind(f.product_description.trim())
            .bind(f.quantity_in_stock)
            .bind(f.buy_price)
            .bind(f.msrp)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, code))
    }

    pub async fn update(&self, product_code: &str, f: &ProductFields) -> Result<Option<Product>, AppError> {
        let sql = format!(
            r#"
            UPDATE products AS p
            SET product_name = $2, product_line = $3, product_scale = $4, product_vendor = $5,
                product_description = $6, quantity_in_stock = $7, buy_price = $8, msrp = $9
            WHERE p.product_code = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(product_code)
            .bind(f.product_name.trim())
            .bind(f.product_line.trim())
            .bind(f.product_scale.trim())
            .bind(f.product_vendor.trim())
            .bind(f.product_description.trim())
            .bind(f.quantity_in_stock)
            .bind(f.buy_price)
            .bind(f.msrp)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, product_code))
    }

    pub async fn delete(&self, product_code: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE product_code = $1")
            .bind(product_code)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::IntegrityViolation(format!(
                        "O produto '{product_code}' aparece em pedidos e não pode ser excluído."
                    ));
                }
                AppError::from(e)
            })?;
        Ok(result.rows_affected())
    }
}
