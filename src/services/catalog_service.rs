// src/services/catalog_service.rs

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::product::{CreateProductPayload, Product, ProductFields, ProductLine, ProductSort},
};

fn product_not_found(product_code: &str) -> AppError {
    AppError::NotFound(format!("Produto '{product_code}' não encontrado."))
}

#[derive(Clone)]
pub struct CatalogService {
    product_repo: ProductRepository,
}

impl CatalogService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    pub async fn list_product_lines(&self) -> Result<Vec<ProductLine>, AppError> {
        self.product_repo.list_lines().await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.product_repo.list().await
    }

    pub async fn products_by_line(&self, product_line: &str, sort: ProductSort) -> Result<Vec<Product>, AppError> {
        if !self.product_repo.line_exists(product_line).await? {
            return Err(AppError::NotFound(format!("Linha de produto '{product_line}' não encontrada.")));
        }
        self.product_repo.list_by_line(product_line, sort).await
    }

    pub async fn get_product(&self, product_code: &str) -> Result<Product, AppError> {
        self.product_repo
            .find(product_code)
            .await?
            .ok_or_else(|| product_not_found(product_code))
    }

    // =========================================================================
    //  ESCRITA (equipe)
    // =========================================================================

    async fn ensure_line_exists(&self, fields: &ProductFields) -> Result<(), AppError> {
        let line = fields.product_line.trim();
        if !self.product_repo.line_exists(line).await? {
            return Err(AppError::InvalidInput(format!("A linha de produto '{line}' não existe.")));
        }
        Ok(())
    }

    pub async fn create_product(&self, payload: &CreateProductPayload) -> Result<Product, AppError> {
        self.ensure_line_exists(&payload.fields).await?;
        let product = self.product_repo.insert(payload).await?;
        tracing::info!(product_code = %product.product_code, "Produto criado");
        Ok(product)
    }

    pub async fn update_product(&self, product_code: &str, fields: &ProductFields) -> Result<Product, AppError> {
        self.ensure_line_exists(fields).await?;
        let product = self
            .product_repo
            .update(product_code, fields)
            .await?
            .ok_or_else(|| product_not_found(product_code))?;
        tracing::info!(product_code, "Produto atualizado");
        Ok(product)
    }

    /// Produtos já vendidos não podem sumir do histórico de pedidos.
    pub async fn delete_product(&self, product_code: &str) -> Result<(), AppError> {
        if self.product_repo.delete(product_code).await? == 0 {
            return Err(product_not_found(product_code));
        }
        tracing::info!(product_code, "Produto excluído");
        Ok(())
    }
}
