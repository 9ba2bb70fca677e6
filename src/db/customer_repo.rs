// src/db/customer_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::customer::{Customer, CustomerBalanceRow, SignupPayload, UpdateProfilePayload},
};

const CUSTOMER_COLUMNS: &str = r#"
    customer_number, customer_name, contact_last_name, contact_first_name,
    phone, address_line1, address_line2, city, state, postal_code, country,
    sales_rep_employee_number, credit_limit
"#;

// Totais por cliente numa única query: pedidos não cancelados e pagamentos.
// As duas somas são agregadas separadamente para não multiplicar linhas no JOIN.
const BALANCE_SELECT: &str = r#"
    SELECT
        c.customer_number, c.customer_name, c.city, c.country,
        COALESCE(o.total, 0)::NUMERIC(14, 2) AS total_orders,
        COALESCE(p.total, 0)::NUMERIC(14, 2) AS total_payments,
        (COALESCE(o.total, 0) - COALESCE(p.total, 0))::NUMERIC(14, 2) AS balance
    FROM customers c
    LEFT JOIN (
        SELECT o.customer_number, SUM(od.quantity_ordered * od.price_each) AS total
        FROM orders o
        JOIN order_details od ON od.order_number = o.order_number
        WHERE o.status <> 'Cancelled'
        GROUP BY o.customer_number
    ) o ON o.customer_number = c.customer_number
    LEFT JOIN (
        SELECT customer_number, SUM(amount) AS total
        FROM payments
        GROUP BY customer_number
    ) p ON p.customer_number = c.customer_number
"#;

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, customer_number: i32) -> Result<Option<Customer>, AppError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_number = $1");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    /// Trava a linha do cliente até o fim da transação.
    pub async fn lock<'e, E>(&self, executor: E, customer_number: i32) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE customer_number = $1 FOR UPDATE");
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_number)
            .fetch_optional(executor)
            .await?;
        Ok(customer)
    }

    pub async fn phone_in_use(&self, phone: &str, except: Option<i32>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM customers
                WHERE phone = $1 AND ($2::INTEGER IS NULL OR customer_number <> $2)
            )
            "#,
        )
        .bind(phone)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        customer_number: i32,
        payload: &SignupPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO customers (
                customer_number, customer_name, contact_last_name, contact_first_name,
                phone, address_line1, city, country
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        );

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_number)
            .bind(payload.customer_name.trim())
            .bind(payload.contact_last_name.trim())
            .bind(payload.contact_first_name.trim())
            .bind(payload.phone.trim())
            .bind(payload.address_line1.trim())
            .bind(payload.city.trim())
            .bind(payload.country.trim())
            .fetch_one(executor)
            .await?;
        Ok(customer)
    }

    pub async fn update_profile(
        &self,
        customer_number: i32,
        payload: &UpdateProfilePayload,
    ) -> Result<Option<Customer>, AppError> {
        let sql = format!(
            r#"
            UPDATE customers
            SET contact_first_name = $2, contact_last_name = $3, phone = $4,
                address_line1 = $5, city = $6, country = $7
            WHERE customer_number = $1
            RETURNING {CUSTOMER_COLUMNS}
            "#
        );

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(customer_number)
            .bind(payload.contact_first_name.trim())
            .bind(payload.contact_last_name.trim())
            .bind(payload.phone.trim())
            .bind(payload.address_line1.trim())
            .bind(payload.city.trim())
            .bind(payload.country.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    // =========================================================================
    //  SALDO
    // =========================================================================

    /// (total dos pedidos não cancelados, total pago)
    pub async fn balance_totals<'e, E>(&self, executor: E, customer_number: i32) -> Result<(Decimal, Decimal), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let totals: (Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT
                COALESCE((
                    SELECT SUM(od.quantity_ordered * od.price_each)
                    FROM orders o
                    JOIN order_details od ON od.order_number = o.order_number
                    WHERE o.customer_number = $1 AND o.status <> 'Cancelled'
                ), 0)::NUMERIC(14, 2),
                COALESCE((
                    SELECT SUM(amount) FROM payments WHERE customer_number = $1
                ), 0)::NUMERIC(14, 2)
            "#,
        )
        .bind(customer_number)
        .fetch_one(executor)
        .await?;
        Ok(totals)
    }

    pub async fn balances_for_sales_rep(&self, employee_number: i32) -> Result<Vec<CustomerBalanceRow>, AppError> {
        let sql = format!(
            "{BALANCE_SELECT} WHERE c.sales_rep_employee_number = $1 ORDER BY c.customer_name"
        );
        let rows = sqlx::query_as::<_, CustomerBalanceRow>(&sql)
            .bind(employee_number)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn balances_for_all(&self) -> Result<Vec<CustomerBalanceRow>, AppError> {
        let sql = format!("{BALANCE_SELECT} ORDER BY c.customer_name");
        let rows = sqlx::query_as::<_, CustomerBalanceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // =========================================================================
    //  CARTEIRA / EXCLUSÃO
    // =========================================================================

    pub async fn reassign_sales_rep<'e, E>(&self, executor: E, from: i32, to: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE customers SET sales_rep_employee_number = $2 WHERE sales_rep_employee_number = $1",
        )
        .bind(from)
        .bind(to)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, customer_number: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE customer_number = $1")
            .bind(customer_number)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
