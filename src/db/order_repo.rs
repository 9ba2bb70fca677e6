// src/db/order_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::is_foreign_key_violation, error::AppError},
    models::order::{Order, OrderLine, OrderScope, OrderSort, OrderStatus},
};

const ORDER_COLUMNS: &str = r#"
    order_number, order_date, required_date, shipped_date,
    status, comments, customer_number
"#;

// Escopo de acesso: pedido + dono + Sales Rep do dono
const SCOPE_SELECT: &str = r#"
    SELECT o.order_number, o.customer_number, o.status, c.sales_rep_employee_number
    FROM orders o
    JOIN customers c ON c.customer_number = o.customer_number
"#;

const LINE_SELECT: &str = r#"
    SELECT d.id, d.order_number, d.product_code, p.product_name,
           d.quantity_ordered, d.price_each, d.order_line_number
    FROM order_details d
    JOIN products p ON p.product_code = d.product_code
"#;

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CABEÇALHO
    // =========================================================================

    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        order_number: i32,
        order_date: NaiveDate,
        required_date: NaiveDate,
        comments: &str,
        customer_number: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO orders (
                order_number, order_date, required_date, shipped_date,
                status, comments, customer_number
            )
            VALUES ($1, $2, $3, NULL, $4, $5, $6)
            "#,
        )
        .bind(order_number)
        .bind(order_date)
        .bind(required_date)
        .bind(OrderStatus::InProcess)
        .bind(comments)
        .bind(customer_number)
        .execute(executor)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::NotFound(format!("Cliente {customer_number} não encontrado."));
            }
            AppError::from(e)
        })?;
        Ok(())
    }

    pub async fn find_order(&self, order_number: i32) -> Result<Option<Order>, AppError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(order_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    pub async fn list_for_customer(&self, customer_number: i32, sort: OrderSort) -> Result<Vec<Order>, AppError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_number = $1 ORDER BY {}",
            sort.order_by()
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(customer_number)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    /// Pedidos de todos os clientes atribuídos a um Sales Rep.
    pub async fn list_for_sales_rep(&self, employee_number: i32, sort: OrderSort) -> Result<Vec<Order>, AppError> {
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE customer_number IN (
                SELECT customer_number FROM customers WHERE sales_rep_employee_number = $1
            )
            ORDER BY {}
            "#,
            sort.order_by()
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(employee_number)
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    pub async fn list_all(&self, sort: OrderSort) -> Result<Vec<Order>, AppError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY {}", sort.order_by());
        let orders = sqlx::query_as::<_, Order>(&sql).fetch_all(&self.pool).await?;
        Ok(orders)
    }

    /// Escopo do pedido. Com `lock = true` trava a linha do pedido
    /// (FOR UPDATE OF o) até o fim da transação.
    pub async fn find_scope<'e, E>(&self, executor: E, order_number: i32, lock: bool) -> Result<Option<OrderScope>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{SCOPE_SELECT} WHERE o.order_number = $1 {}",
            if lock { "FOR UPDATE OF o" } else { "" }
        );
        let scope = sqlx::query_as::<_, OrderScope>(&sql)
            .bind(order_number)
            .fetch_optional(executor)
            .await?;
        Ok(scope)
    }

    /// Escopo do pedido dono de uma linha, travando o pedido.
    pub async fn lock_scope_by_line<'e, E>(&self, executor: E, line_id: i64) -> Result<Option<OrderScope>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            {SCOPE_SELECT}
            WHERE o.order_number = (SELECT order_number FROM order_details WHERE id = $1)
            FOR UPDATE OF o
            "#
        );
        let scope = sqlx::query_as::<_, OrderScope>(&sql)
            .bind(line_id)
            .fetch_optional(executor)
            .await?;
        Ok(scope)
    }

    pub async fn set_comment(&self, order_number: i32, comment: &str) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE orders SET comments = $2 WHERE order_number = $1")
            .bind(order_number)
            .bind(comment)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Cancela o pedido. `comment = None` preserva o comentário atual.
    pub async fn cancel<'e, E>(&self, executor: E, order_number: i32, comment: Option<&str>) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE orders SET status = $2, comments = COALESCE($3, comments) WHERE order_number = $1",
        )
        .bind(order_number)
        .bind(OrderStatus::Cancelled)
        .bind(comment)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  LINHAS (order_details)
    // =========================================================================

    pub async fn insert_line<'e, E>(
        &self,
        executor: E,
        order_number: i32,
        product_code: &str,
        quantity: i32,
        price_each: Decimal,
        line_number: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO order_details (
                order_number, product_code, quantity_ordered, price_each, order_line_number
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order_number)
        .bind(product_code)
        .bind(quantity)
        .bind(price_each)
        .bind(line_number)
        .execute(executor)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::IntegrityViolation(format!("O produto '{product_code}' não existe."));
            }
            AppError::from(e)
        })?;
        Ok(())
    }

    pub async fn list_lines(&self, order_number: i32) -> Result<Vec<OrderLine>, AppError> {
        let sql = format!("{LINE_SELECT} WHERE d.order_number = $1 ORDER BY d.order_line_number");
        let lines = sqlx::query_as::<_, OrderLine>(&sql)
            .bind(order_number)
            .fetch_all(&self.pool)
            .await?;
        Ok(lines)
    }

    pub async fn find_line<'e, E>(&self, executor: E, line_id: i64) -> Result<Option<OrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{LINE_SELECT} WHERE d.id = $1");
        let line = sqlx::query_as::<_, OrderLine>(&sql)
            .bind(line_id)
            .fetch_optional(executor)
            .await?;
        Ok(line)
    }

    pub async fn update_line_quantity<'e, E>(&self, executor: E, line_id: i64, quantity: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE order_details SET quantity_ordered = $2 WHERE id = $1")
            .bind(line_id)
            .bind(quantity)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_line<'e, E>(&self, executor: E, line_id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM order_details WHERE id = $1")
            .bind(line_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Fecha o buraco deixado por uma linha removida: as linhas seguintes
    /// descem uma posição. A unique (pedido, linha) é diferida.
    pub async fn renumber_after<'e, E>(&self, executor: E, order_number: i32, removed_line: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE order_details
            SET order_line_number = order_line_number - 1
            WHERE order_number = $1 AND order_line_number > $2
            "#,
        )
        .bind(order_number)
        .bind(removed_line)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_lines<'e, E>(&self, executor: E, order_number: i32) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM order_details WHERE order_number = $1")
            .bind(order_number)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    // =========================================================================
    //  EXCLUSÃO EM CASCATA (conta do cliente)
    // =========================================================================

    pub async fn delete_details_for_customer<'e, E>(&self, executor: E, customer_number: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM order_details
            WHERE order_number IN (SELECT order_number FROM orders WHERE customer_number = $1)
            "#,
        )
        .bind(customer_number)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_orders_for_customer<'e, E>(&self, executor: E, customer_number: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM orders WHERE customer_number = $1")
            .bind(customer_number)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
