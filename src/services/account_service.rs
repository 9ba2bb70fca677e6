// src/services/account_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{AuthRepository, CustomerRepository, EmployeeRepository, OrderRepository, PaymentRepository},
    models::{
        auth::{EmployeeRole, Principal, PrincipalKind},
        customer::DeletionEligibility,
        employee::TerminationOutcome,
    },
    services::{AuthService, BalanceService},
};

/// Substituto do Sales Rep desligado: o menor número entre os outros
/// Sales Reps do mesmo escritório.
pub fn pick_replacement(candidates: &[i32]) -> Option<i32> {
    candidates.iter().copied().min()
}

#[derive(Clone)]
pub struct AccountService {
    pool: PgPool,
    auth_service: AuthService,
    balance_service: BalanceService,
    auth_repo: AuthRepository,
    customer_repo: CustomerRepository,
    employee_repo: EmployeeRepository,
    order_repo: OrderRepository,
    payment_repo: PaymentRepository,
}

impl AccountService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        auth_service: AuthService,
        balance_service: BalanceService,
        auth_repo: AuthRepository,
        customer_repo: CustomerRepository,
        employee_repo: EmployeeRepository,
        order_repo: OrderRepository,
        payment_repo: PaymentRepository,
    ) -> Self {
        Self {
            pool,
            auth_service,
            balance_service,
            auth_repo,
            customer_repo,
            employee_repo,
            order_repo,
            payment_repo,
        }
    }

    // =========================================================================
    //  EXCLUSÃO DE CONTA DO CLIENTE
    // =========================================================================

    /// Checagem prévia, antes de pedir senha e confirmação.
    pub async fn deletion_eligibility(&self, customer_number: i32) -> Result<DeletionEligibility, AppError> {
        let balance = self.balance_service.balance(&self.pool, customer_number).await?;
        Ok(DeletionEligibility {
            eligible: !balance.has_debt(),
            balance,
        })
    }

    /// Remove o cliente e todo o histórico dele. O saldo é conferido duas
    /// vezes: antes e de novo com a linha do cliente travada.
    pub async fn delete_customer(
        &self,
        principal: &Principal,
        customer_number: i32,
        password: &str,
        confirmed: bool,
    ) -> Result<(), AppError> {
        if principal.customer_id() != Some(customer_number) {
            return Err(AppError::Forbidden("Só o próprio cliente pode excluir a conta.".into()));
        }
        if !confirmed {
            return Err(AppError::InvalidInput("Confirme a exclusão da conta.".into()));
        }

        self.auth_service
            .verify_credentials(PrincipalKind::Customer, customer_number, password)
            .await?;

        let eligibility = self.deletion_eligibility(customer_number).await?;
        if !eligibility.eligible {
            return Err(AppError::OutstandingBalance(eligibility.balance.balance));
        }

        let mut tx = self.pool.begin().await?;

        self.customer_repo
            .lock(&mut *tx, customer_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cliente {customer_number} não encontrado.")))?;

        let balance = self.balance_service.balance(&mut *tx, customer_number).await?;
        if balance.has_debt() {
            return Err(AppError::OutstandingBalance(balance.balance));
        }

        let details = self.order_repo.delete_details_for_customer(&mut *tx, customer_number).await?;
        let orders = self.order_repo.delete_orders_for_customer(&mut *tx, customer_number).await?;
        let payments = self.payment_repo.delete_for_customer(&mut *tx, customer_number).await?;
        self.auth_repo
            .delete_hash(&mut *tx, PrincipalKind::Customer, customer_number)
            .await?;
        self.customer_repo.delete(&mut *tx, customer_number).await?;

        tx.commit().await?;

        tracing::info!(customer_number, orders, details, payments, "Conta de cliente excluída");
        Ok(())
    }

    // =========================================================================
    //  DESLIGAMENTO DE SALES REP
    // =========================================================================

    pub async fn terminate_sales_rep(&self, principal: &Principal, employee_number: i32) -> Result<TerminationOutcome, AppError> {
        if !principal.is_manager_tier() {
            return Err(AppError::Forbidden("Apenas gerentes podem desligar funcionários.".into()));
        }

        let mut tx = self.pool.begin().await?;

        let target = self
            .employee_repo
            .lock(&mut *tx, employee_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Funcionário {employee_number} não encontrado.")))?;

        if target.role != EmployeeRole::SalesRep {
            return Err(AppError::Conflict(format!(
                "O funcionário {employee_number} não é Sales Rep."
            )));
        }

        let candidates = self
            .employee_repo
            .other_sales_reps_in_office(&mut *tx, &target.office_code, employee_number)
            .await?;
        let replacement = pick_replacement(&candidates).ok_or_else(|| AppError::NoReplacementRep {
            office_code: target.office_code.clone(),
        })?;

        let reassigned_customers = self
            .customer_repo
            .reassign_sales_rep(&mut *tx, employee_number, replacement)
            .await?;
        self.employee_repo
            .repoint_reports_to(&mut *tx, employee_number, target.reports_to)
            .await?;
        self.auth_repo
            .delete_hash(&mut *tx, PrincipalKind::Employee, employee_number)
            .await?;
        self.employee_repo.delete_reports(&mut *tx, employee_number).await?;
        self.employee_repo.delete(&mut *tx, employee_number).await?;

        tx.commit().await?;

        tracing::info!(
            terminated = employee_number,
            replacement,
            reassigned_customers,
            by = principal.id,
            "Sales Rep desligado"
        );

        Ok(TerminationOutcome {
            terminated: employee_number,
            replacement,
            reassigned_customers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_is_lowest_employee_number() {
        assert_eq!(pick_replacement(&[1504, 1165, 1188]), Some(1165));
    }

    #[test]
    fn no_candidates_means_no_replacement() {
        assert_eq!(pick_replacement(&[]), None);
    }
}
