// src/db/auth_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::auth::PrincipalKind};

// Credenciais ficam em tabelas 1:1 com o perfil (customer_auth / employee_auth)
#[derive(Clone)]
pub struct AuthRepository {
    pool: PgPool,
}

impl AuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca o hash guardado para o principal
    pub async fn find_hash(&self, kind: PrincipalKind, id: i32) -> Result<Option<String>, AppError> {
        let sql = match kind {
            PrincipalKind::Customer => {
                "SELECT hashed_password FROM customer_auth WHERE customer_number = $1"
            }
            PrincipalKind::Employee => {
                "SELECT hashed_password FROM employee_auth WHERE employee_number = $1"
            }
        };

        let hash = sqlx::query_scalar::<_, String>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(hash)
    }

    pub async fn insert_hash<'e, E>(
        &self,
        executor: E,
        kind: PrincipalKind,
        id: i32,
        hashed_password: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = match kind {
            PrincipalKind::Customer => {
                "INSERT INTO customer_auth (customer_number, hashed_password) VALUES ($1, $2)"
            }
            PrincipalKind::Employee => {
                "INSERT INTO employee_auth (employee_number, hashed_password) VALUES ($1, $2)"
            }
        };

        sqlx::query(sql)
            .bind(id)
            .bind(hashed_password)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn update_hash(
        &self,
        kind: PrincipalKind,
        id: i32,
        hashed_password: &str,
    ) -> Result<u64, AppError> {
        let sql = match kind {
            PrincipalKind::Customer => {
                "UPDATE customer_auth SET hashed_password = $2 WHERE customer_number = $1"
            }
            PrincipalKind::Employee => {
                "UPDATE employee_auth SET hashed_password = $2 WHERE employee_number = $1"
            }
        };

        let result = sqlx::query(sql)
            .bind(id)
            .bind(hashed_password)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_hash<'e, E>(&self, executor: E, kind: PrincipalKind, id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = match kind {
            PrincipalKind::Customer => "DELETE FROM customer_auth WHERE customer_number = $1",
            PrincipalKind::Employee => "DELETE FROM employee_auth WHERE employee_number = $1",
        };

        let result = sqlx::query(sql).bind(id).execute(executor).await?;
        Ok(result.rows_affected())
    }
}
