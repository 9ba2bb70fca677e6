// src/common/db_utils.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::common::error::AppError;

// ---
// Sequências de ids (substituem o antigo MAX()+1)
// ---
#[derive(Debug, Clone, Copy)]
pub enum IdSequence {
    OrderNumber,
    CustomerNumber,
    EmployeeNumber,
}

impl IdSequence {
    fn query(self) -> &'static str {
        match self {
            IdSequence::OrderNumber => "SELECT nextval('order_number_seq')::INTEGER",
            IdSequence::CustomerNumber => "SELECT nextval('customer_number_seq')::INTEGER",
            IdSequence::EmployeeNumber => "SELECT nextval('employee_number_seq')::INTEGER",
        }
    }
}

/// Reserva o próximo id da sequência. Dois escritores concorrentes nunca
/// recebem o mesmo valor, mesmo que uma das transações sofra rollback.
pub(crate) async fn next_id<'e, E>(executor: E, sequence: IdSequence) -> Result<i32, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    let id: i32 = sqlx::query_scalar(sequence.query())
        .fetch_one(executor)
        .await?;
    Ok(id)
}

/// Avança as sequências para depois dos maiores ids já gravados
/// (dados históricos importados por fora da aplicação).
pub async fn sync_id_sequences(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("SELECT sync_id_sequences()")
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

pub(crate) fn is_check_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_check_violation())
}
