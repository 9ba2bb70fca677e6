// src/db/payment_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::is_unique_violation, error::AppError},
    models::payment::Payment,
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        customer_number: i32,
        check_number: &str,
        payment_date: NaiveDate,
        amount: Decimal,
    ) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (customer_number, check_number, payment_date, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING customer_number, check_number, payment_date, amount
            "#,
        )
        .bind(customer_number)
        .bind(check_number)
        .bind(payment_date)
        .bind(amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::Conflict(format!("O cheque '{check_number}' já foi registrado."));
            }
            e.into()
        })
    }

    pub async fn list_for_customer(&self, customer_number: i32) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT customer_number, check_number, payment_date, amount
            FROM payments
            WHERE customer_number = $1
            ORDER BY payment_date DESC, check_number
            "#,
        )
        .bind(customer_number)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    pub async fn delete_for_customer<'e, E>(&self, executor: E, customer_number: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM payments WHERE customer_number = $1")
            .bind(customer_number)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
