// src/db/employee_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{
        auth::EmployeeRole,
        employee::{CreateEmployeePayload, Employee, EmployeeReport, TeamReport},
    },
};

const EMPLOYEE_COLUMNS: &str = r#"
    employee_number, last_name, first_name, extension, email,
    office_code, reports_to, job_title, role
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, employee_number: i32) -> Result<Option<Employee>, AppError> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_number = $1");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    /// Trava a linha do funcionário até o fim da transação.
    pub async fn lock<'e, E>(&self, executor: E, employee_number: i32) -> Result<Option<Employee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_number = $1 FOR UPDATE");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_number)
            .fetch_optional(executor)
            .await?;
        Ok(employee)
    }

    pub async fn list_subordinates(&self, manager: i32) -> Result<Vec<Employee>, AppError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE reports_to = $1 ORDER BY employee_number"
        );
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(manager)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    /// Outros Sales Reps do mesmo escritório, menor número primeiro.
    pub async fn other_sales_reps_in_office<'e, E>(
        &self,
        executor: E,
        office_code: &str,
        except: i32,
    ) -> Result<Vec<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT employee_number FROM employees
            WHERE office_code = $1 AND role = $2 AND employee_number <> $3
            ORDER BY employee_number ASC
            "#,
        )
        .bind(office_code)
        .bind(EmployeeRole::SalesRep)
        .bind(except)
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        employee_number: i32,
        payload: &CreateEmployeePayload,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO employees (
                employee_number, last_name, first_name, extension, email,
                office_code, reports_to, job_title, role
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        );

        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_number)
            .bind(payload.last_name.trim())
            .bind(payload.first_name.trim())
            .bind(payload.extension.trim())
            .bind(payload.email.trim())
            .bind(payload.office_code.trim())
            .bind(payload.reports_to)
            .bind(payload.job_title.trim())
            .bind(payload.role)
            .fetch_one(executor)
            .await?;
        Ok(employee)
    }

    /// Quem reportava ao funcionário passa a reportar ao chefe dele.
    pub async fn repoint_reports_to<'e, E>(
        &self,
        executor: E,
        from: i32,
        to: Option<i32>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE employees SET reports_to = $2 WHERE reports_to = $1")
            .bind(from)
            .bind(to)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(&self, executor: E, employee_number: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM employees WHERE employee_number = $1")
            .bind(employee_number)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  RELATÓRIOS DOS FUNCIONÁRIOS
    // =========================================================================

    pub async fn create_report(&self, employee_number: i32, content: &str) -> Result<EmployeeReport, AppError> {
        let report = sqlx::query_as::<_, EmployeeReport>(
            r#"
            INSERT INTO employee_reports (employee_number, content)
            VALUES ($1, $2)
            RETURNING id, employee_number, content, created_at
            "#,
        )
        .bind(employee_number)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(report)
    }

    pub async fn list_reports(&self, employee_number: i32) -> Result<Vec<EmployeeReport>, AppError> {
        let reports = sqlx::query_as::<_, EmployeeReport>(
            r#"
            SELECT id, employee_number, content, created_at
            FROM employee_reports
            WHERE employee_number = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(employee_number)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    pub async fn list_team_reports(&self, manager: i32) -> Result<Vec<TeamReport>, AppError> {
        let reports = sqlx::query_as::<_, TeamReport>(
            r#"
            SELECT r.id, r.employee_number, e.first_name, e.last_name, r.content, r.created_at
            FROM employee_reports r
            JOIN employees e ON e.employee_number = r.employee_number
            WHERE e.reports_to = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(manager)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    pub async fn delete_reports<'e, E>(&self, executor: E, employee_number: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM employee_reports WHERE employee_number = $1")
            .bind(employee_number)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
