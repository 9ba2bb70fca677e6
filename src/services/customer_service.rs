// src/services/customer_service.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{is_unique_violation, next_id, IdSequence},
        error::AppError,
    },
    db::{AuthRepository, CustomerRepository, PaymentRepository},
    models::{
        auth::{Principal, PrincipalKind},
        customer::{Customer, CustomerBalanceRow, CustomerProfile, SignupPayload, UpdateProfilePayload},
        payment::{NewPaymentPayload, Payment},
    },
    services::{AuthService, BalanceService},
};

fn phone_taken() -> AppError {
    AppError::Conflict("Este telefone já está cadastrado.".into())
}

// A unique do telefone pode disparar numa corrida entre dois cadastros
fn map_phone_conflict(e: AppError) -> AppError {
    match e {
        AppError::DatabaseError(ref db_err) if is_unique_violation(db_err) => phone_taken(),
        other => other,
    }
}

fn customer_not_found(customer_number: i32) -> AppError {
    AppError::NotFound(format!("Cliente {customer_number} não encontrado."))
}

#[derive(Clone)]
pub struct CustomerService {
    pool: PgPool,
    auth_service: AuthService,
    balance_service: BalanceService,
    auth_repo: AuthRepository,
    customer_repo: CustomerRepository,
    payment_repo: PaymentRepository,
}

impl CustomerService {
    pub fn new(
        pool: PgPool,
        auth_service: AuthService,
        balance_service: BalanceService,
        auth_repo: AuthRepository,
        customer_repo: CustomerRepository,
        payment_repo: PaymentRepository,
    ) -> Self {
        Self {
            pool,
            auth_service,
            balance_service,
            auth_repo,
            customer_repo,
            payment_repo,
        }
    }

    /// Cadastro: perfil + credencial na mesma transação, número vindo da sequência.
    pub async fn signup(&self, payload: &SignupPayload) -> Result<i32, AppError> {
        if self.customer_repo.phone_in_use(payload.phone.trim(), None).await? {
            return Err(phone_taken());
        }

        // O hash fica fora da transação, pois não toca no banco
        let hashed_password = self.auth_service.hash_password(&payload.password).await?;

        let mut tx = self.pool.begin().await?;

        let customer_number = next_id(&mut *tx, IdSequence::CustomerNumber).await?;
        self.customer_repo
            .insert(&mut *tx, customer_number, payload)
            .await
            .map_err(map_phone_conflict)?;
        self.auth_repo
            .insert_hash(&mut *tx, PrincipalKind::Customer, customer_number, &hashed_password)
            .await?;

        tx.commit().await?;

        tracing::info!(customer_number, "Novo cliente cadastrado");
        Ok(customer_number)
    }

    pub async fn get_profile(&self, customer_number: i32) -> Result<CustomerProfile, AppError> {
        let customer = self
            .customer_repo
            .find_by_id(customer_number)
            .await?
            .ok_or_else(|| customer_not_found(customer_number))?;
        let balance = self.balance_service.balance(&self.pool, customer_number).await?;
        let payments = self.payment_repo.list_for_customer(customer_number).await?;

        Ok(CustomerProfile {
            customer,
            balance,
            payments,
        })
    }

    /// Ficha do cliente vista pela equipe: gerentes veem todos, Sales Reps
    /// só os da própria carteira.
    pub async fn get_customer(&self, principal: &Principal, customer_number: i32) -> Result<CustomerProfile, AppError> {
        let profile = self.get_profile(customer_number).await?;

        let allowed = principal.is_manager_tier()
            || (principal.is_staff() && profile.customer.sales_rep_employee_number == Some(principal.id));
        if !allowed {
            return Err(AppError::Forbidden(format!("Sem acesso ao cliente {customer_number}.")));
        }
        Ok(profile)
    }

    pub async fn update_profile(&self, customer_number: i32, payload: &UpdateProfilePayload) -> Result<Customer, AppError> {
        if self
            .customer_repo
            .phone_in_use(payload.phone.trim(), Some(customer_number))
            .await?
        {
            return Err(phone_taken());
        }

        self.customer_repo
            .update_profile(customer_number, payload)
            .await
            .map_err(map_phone_conflict)?
            .ok_or_else(|| customer_not_found(customer_number))
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    pub async fn record_payment(&self, customer_number: i32, payload: &NewPaymentPayload) -> Result<Payment, AppError> {
        let payment = self
            .payment_repo
            .insert(
                customer_number,
                payload.check_number.trim(),
                Utc::now().date_naive(),
                payload.amount,
            )
            .await?;

        tracing::info!(customer_number, check_number = %payment.check_number, amount = %payment.amount, "Pagamento registrado");
        Ok(payment)
    }

    pub async fn list_payments(&self, customer_number: i32) -> Result<Vec<Payment>, AppError> {
        self.payment_repo.list_for_customer(customer_number).await
    }

    /// Lista de clientes com saldo, só para o escalão gerencial.
    pub async fn list_customers_with_balances(&self, principal: &Principal) -> Result<Vec<CustomerBalanceRow>, AppError> {
        if !principal.is_manager_tier() {
            return Err(AppError::Forbidden("Apenas gerentes veem todos os clientes.".into()));
        }
        self.balance_service.balances_for_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_pass_through_phone_mapping() {
        let mapped = map_phone_conflict(AppError::InvalidInput("x".into()));
        assert!(matches!(mapped, AppError::InvalidInput(_)));
    }
}
