// src/services/employee_service.rs

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{next_id, IdSequence},
        error::AppError,
    },
    db::{AuthRepository, EmployeeRepository, OfficeRepository},
    models::{
        auth::{EmployeeRole, Principal, PrincipalKind},
        employee::{CreateEmployeePayload, Dashboard, EmployeeReport},
    },
    services::{AuthService, BalanceService},
};

fn ensure_staff(principal: &Principal) -> Result<i32, AppError> {
    principal
        .employee_id()
        .ok_or_else(|| AppError::Forbidden("Área restrita a funcionários.".into()))
}

#[derive(Clone)]
pub struct EmployeeService {
    pool: PgPool,
    auth_service: AuthService,
    balance_service: BalanceService,
    auth_repo: AuthRepository,
    employee_repo: EmployeeRepository,
    office_repo: OfficeRepository,
}

impl EmployeeService {
    pub fn new(
        pool: PgPool,
        auth_service: AuthService,
        balance_service: BalanceService,
        auth_repo: AuthRepository,
        employee_repo: EmployeeRepository,
        office_repo: OfficeRepository,
    ) -> Self {
        Self {
            pool,
            auth_service,
            balance_service,
            auth_repo,
            employee_repo,
            office_repo,
        }
    }

    /// Contratação feita pelo escalão gerencial. Só o Presidente nomeia
    /// outro Presidente.
    pub async fn create_employee(&self, principal: &Principal, payload: &CreateEmployeePayload) -> Result<i32, AppError> {
        if !principal.is_manager_tier() {
            return Err(AppError::Forbidden("Apenas gerentes podem cadastrar funcionários.".into()));
        }
        if payload.role == EmployeeRole::President && !principal.is_president() {
            return Err(AppError::Forbidden("Apenas o Presidente nomeia outro Presidente.".into()));
        }

        let office_code = payload.office_code.trim();
        if self.office_repo.find(office_code).await?.is_none() {
            return Err(AppError::InvalidInput(format!("O escritório '{office_code}' não existe.")));
        }
        if let Some(manager) = payload.reports_to {
            if self.employee_repo.find_by_id(manager).await?.is_none() {
                return Err(AppError::InvalidInput(format!("O gestor {manager} não existe.")));
            }
        }

        let hashed_password = self.auth_service.hash_password(&payload.password).await?;

        let mut tx = self.pool.begin().await?;

        let employee_number = next_id(&mut *tx, IdSequence::EmployeeNumber).await?;
        let employee = self.employee_repo.insert(&mut *tx, employee_number, payload).await?;
        self.auth_repo
            .insert_hash(&mut *tx, PrincipalKind::Employee, employee_number, &hashed_password)
            .await?;

        tx.commit().await?;

        tracing::info!(employee_number, role = ?employee.role, office = %employee.office_code, by = principal.id, "Funcionário cadastrado");
        Ok(employee_number)
    }

    /// Sales Reps recebem a carteira com saldos; os demais, os subordinados.
    pub async fn dashboard(&self, principal: &Principal) -> Result<Dashboard, AppError> {
        let employee_number = ensure_staff(principal)?;
        let employee = self
            .employee_repo
            .find_by_id(employee_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Funcionário {employee_number} não encontrado.")))?;

        let is_sales_rep = employee.role == EmployeeRole::SalesRep;
        let (customers, subordinates) = if is_sales_rep {
            (self.balance_service.balances_for_sales_rep(employee_number).await?, Vec::new())
        } else {
            (Vec::new(), self.employee_repo.list_subordinates(employee_number).await?)
        };

        let my_reports = self.employee_repo.list_reports(employee_number).await?;
        let team_reports = self.employee_repo.list_team_reports(employee_number).await?;

        Ok(Dashboard {
            employee,
            is_sales_rep,
            customers,
            subordinates,
            my_reports,
            team_reports,
        })
    }

    pub async fn create_report(&self, principal: &Principal, content: &str) -> Result<EmployeeReport, AppError> {
        let employee_number = ensure_staff(principal)?;
        let content = content.trim();
        if content.is_empty() || content.chars().count() > 2000 {
            return Err(AppError::InvalidInput(
                "O relatório deve ter entre 1 e 2000 caracteres.".into(),
            ));
        }

        let report = self.employee_repo.create_report(employee_number, content).await?;
        tracing::info!(employee_number, report_id = report.id, "Relatório registrado");
        Ok(report)
    }
}
