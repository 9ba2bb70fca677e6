// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    common::error::AppError,
    db::{
        AuthRepository, CustomerRepository, EmployeeRepository, OfficeRepository, OrderRepository,
        PaymentRepository, ProductRepository, ReportRepository,
    },
    services::{
        AccountService, AuthService, BalanceService, CartService, CartStore, CatalogService, CustomerService,
        EmployeeService, OfficeService, OrderService, ReportService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Configuração lida do ambiente (.env carregado pelo dotenvy)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = get("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET não pode ser vazio");
        }

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DB_MAX_CONNECTIONS deve ser um número")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(v) => v.parse().context("BCRYPT_COST deve ser um número")?,
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            bcrypt_cost,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub account_service: AccountService,
    pub cart_service: CartService,
    pub catalog_service: CatalogService,
    pub customer_service: CustomerService,
    pub employee_service: EmployeeService,
    pub office_service: OfficeService,
    pub order_service: OrderService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config)?)
    }

    /// Monta o gráfico de dependências sobre um pool já aberto.
    pub fn from_pool(db_pool: PgPool, config: &Config) -> Result<Self, AppError> {
        let auth_repo = AuthRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let employee_repo = EmployeeRepository::new(db_pool.clone());
        let office_repo = OfficeRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let cart_store = CartStore::new();

        let auth_service = AuthService::new(
            auth_repo.clone(),
            customer_repo.clone(),
            employee_repo.clone(),
            cart_store.clone(),
            config.jwt_secret.clone(),
            config.bcrypt_cost,
        )?;
        let balance_service = BalanceService::new(customer_repo.clone());
        let order_service = OrderService::new(order_repo.clone(), customer_repo.clone(), db_pool.clone());

        let account_service = AccountService::new(
            db_pool.clone(),
            auth_service.clone(),
            balance_service.clone(),
            auth_repo.clone(),
            customer_repo.clone(),
            employee_repo.clone(),
            order_repo,
            payment_repo.clone(),
        );
        let cart_service = CartService::new(cart_store, product_repo.clone(), order_service.clone());
        let catalog_service = CatalogService::new(product_repo);
        let customer_service = CustomerService::new(
            db_pool.clone(),
            auth_service.clone(),
            balance_service.clone(),
            auth_repo.clone(),
            customer_repo,
            payment_repo,
        );
        let employee_service = EmployeeService::new(
            db_pool.clone(),
            auth_service.clone(),
            balance_service,
            auth_repo,
            employee_repo,
            office_repo.clone(),
        );
        let office_service = OfficeService::new(office_repo, db_pool.clone());
        let report_service = ReportService::new(report_repo);

        Ok(Self {
            db_pool,
            auth_service,
            account_service,
            cart_service,
            catalog_service,
            customer_service,
            employee_service,
            office_service,
            order_service,
            report_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_missing() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/classicmodels"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn missing_jwt_secret_is_an_error() {
        let result = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/classicmodels")]));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/classicmodels"),
            ("JWT_SECRET", "s3cret"),
            ("BCRYPT_COST", "dez"),
        ]));
        assert!(result.is_err());
    }
}
