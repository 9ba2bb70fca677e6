// src/db/office_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::is_unique_violation, error::AppError},
    models::office::{CreateOfficePayload, Office, UpdateOfficePayload},
};

const OFFICE_COLUMNS: &str = r#"
    office_code, city, phone, address_line1, address_line2,
    state, country, postal_code, territory
"#;

#[derive(Clone)]
pub struct OfficeRepository {
    pool: PgPool,
}

impl OfficeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Office>, AppError> {
        let sql = format!("SELECT {OFFICE_COLUMNS} FROM offices ORDER BY office_code");
        let offices = sqlx::query_as::<_, Office>(&sql).fetch_all(&self.pool).await?;
        Ok(offices)
    }

    pub async fn find(&self, office_code: &str) -> Result<Option<Office>, AppError> {
        let sql = format!("SELECT {OFFICE_COLUMNS} FROM offices WHERE office_code = $1");
        let office = sqlx::query_as::<_, Office>(&sql)
            .bind(office_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(office)
    }

    pub async fn insert(&self, payload: &CreateOfficePayload) -> Result<Office, AppError> {
        let sql = format!(
            r#"
            INSERT INTO offices (
                office_code, city, phone, address_line1, address_line2,
                state, country, postal_code, territory
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {OFFICE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Office>(&sql)
            .bind(payload.office_code.trim())
            .bind(payload.city.trim())
            .bind(payload.phone.trim())
            .bind(payload.address_line1.trim())
            .bind(payload.address_line2.as_deref().map(str::trim))
            .bind(payload.state.as_deref().map(str::trim))
            .bind(payload.country.trim())
            .bind(payload.postal_code.trim())
            .bind(payload.territory.trim())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    return AppError::Conflict(format!(
                        "O escritório '{}' já existe.",
                        payload.office_code.trim()
                    ));
                }
                e.into()
            })
    }

    pub async fn update(&self, office_code: &str, payload: &UpdateOfficePayload) -> Result<Option<Office>, AppError> {
        let sql = format!(
            r#"
            UPDATE offices
            SET phone = $2, address_line1 = $3, address_line2 = $4,
                state = $5, postal_code = $6, territory = $7
            WHERE office_code = $1
            RETURNING {OFFICE_COLUMNS}
            "#
        );

        let office = sqlx::query_as::<_, Office>(&sql)
            .bind(office_code)
            .bind(payload.phone.trim())
            .bind(payload.address_line1.trim())
            .bind(payload.address_line2.as_deref().map(str::trim))
            .bind(payload.state.as_deref().map(str::trim))
            .bind(payload.postal_code.trim())
            .bind(payload.territory.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(office)
    }

    /// Trava o escritório (FOR UPDATE) e conta quantos funcionários ele tem.
    /// None se o escritório não existe.
    pub async fn lock_and_count_employees<'e, E>(&self, executor: E, office_code: &str) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT (SELECT COUNT(*) FROM employees e WHERE e.office_code = o.office_code)
            FROM offices o
            WHERE o.office_code = $1
            FOR UPDATE
            "#,
        )
        .bind(office_code)
        .fetch_optional(executor)
        .await?;
        Ok(count)
    }

    pub async fn delete<'e, E>(&self, executor: E, office_code: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM offices WHERE office_code = $1")
            .bind(office_code)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
