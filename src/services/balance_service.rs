// src/services/balance_service.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    models::customer::{BalanceSummary, CustomerBalanceRow},
};

/// Saldo dos clientes: pedidos não cancelados menos pagamentos.
#[derive(Clone)]
pub struct BalanceService {
    customer_repo: CustomerRepository,
}

impl BalanceService {
    pub fn new(customer_repo: CustomerRepository) -> Self {
        Self { customer_repo }
    }

    /// Saldo de um cliente. Roda no executor recebido para que a exclusão
    /// de conta possa recalcular dentro da própria transação.
    pub async fn balance<'e, E>(&self, executor: E, customer_number: i32) -> Result<BalanceSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (total_orders, total_payments) = self.customer_repo.balance_totals(executor, customer_number).await?;
        Ok(BalanceSummary::from_totals(total_orders, total_payments))
    }

    /// Carteira de um Sales Rep, uma query agregada para o lote inteiro.
    pub async fn balances_for_sales_rep(&self, employee_number: i32) -> Result<Vec<CustomerBalanceRow>, AppError> {
        self.customer_repo.balances_for_sales_rep(employee_number).await
    }

    pub async fn balances_for_all(&self) -> Result<Vec<CustomerBalanceRow>, AppError> {
        self.customer_repo.balances_for_all().await
    }
}
