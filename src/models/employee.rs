// src/models/employee.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::common::validation::not_blank;
use crate::models::{auth::EmployeeRole, customer::CustomerBalanceRow};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_number: i32,
    pub last_name: String,
    pub first_name: String,
    pub extension: String,
    pub email: String,
    pub office_code: String,
    pub reports_to: Option<i32>,
    pub job_title: String,
    pub role: EmployeeRole,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeReport {
    pub id: i64,
    pub employee_number: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// Relatório de um subordinado, com o nome de quem escreveu
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamReport {
    pub id: i64,
    pub employee_number: i32,
    pub first_name: String,
    pub last_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Painel do funcionário. Sales Reps recebem a carteira com saldos;
/// os demais recebem os subordinados diretos.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub employee: Employee,
    pub is_sales_rep: bool,
    pub customers: Vec<CustomerBalanceRow>,
    pub subordinates: Vec<Employee>,
    pub my_reports: Vec<EmployeeReport>,
    pub team_reports: Vec<TeamReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminationOutcome {
    pub terminated: i32,
    pub replacement: i32,
    pub reassigned_customers: u64,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 1, max = 50, message = "Máximo de 50 caracteres."), custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Máximo de 50 caracteres."), custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 10, message = "Ramal com até 10 caracteres."))]
    pub extension: String,
    #[validate(email(message = "O e-mail fornecido é inválido."), length(max = 100))]
    pub email: String,
    #[validate(length(min = 1, max = 10, message = "Código de escritório inválido."))]
    pub office_code: String,
    pub reports_to: Option<i32>,
    #[validate(length(min = 1, max = 50, message = "Máximo de 50 caracteres."), custom(function = "not_blank"))]
    pub job_title: String,
    pub role: EmployeeRole,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportPayload {
    #[validate(
        length(min = 1, max = 2000, message = "O relatório deve ter entre 1 e 2000 caracteres."),
        custom(function = "not_blank")
    )]
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeResponse {
    pub employee_number: i32,
}
