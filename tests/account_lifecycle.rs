// tests/account_lifecycle.rs
//
// Rodam quando DATABASE_URL aponta para um Postgres (ver build.rs).

mod common;

use rust_decimal::Decimal;
use sqlx::PgPool;

use classicmodels_backend::{
    common::error::AppError,
    models::{
        auth::{EmployeeRole, LoginPayload, PrincipalKind},
        payment::NewPaymentPayload,
    },
};
use common::{
    as_customer, as_employee, count, customer, item, setup, LONE_REP, MANAGER, PASSWORD, REP_A, REP_B,
};

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn wrong_password_and_unknown_id_fail_the_same_way(pool: PgPool) {
    let state = setup(&pool).await;
    let c = customer(&state, &pool, "40 32 2555", REP_A).await;

    let wrong = state.auth_service.verify_credentials(PrincipalKind::Customer, c, "nope").await;
    let unknown = state.auth_service.verify_credentials(PrincipalKind::Customer, 999_999, PASSWORD).await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));
    assert!(matches!(unknown, Err(AppError::InvalidCredentials)));

    let login = state
        .auth_service
        .login(&LoginPayload {
            kind: PrincipalKind::Employee,
            number: REP_A,
            password: PASSWORD.into(),
        })
        .await
        .unwrap();
    let principal = state.auth_service.validate_token(&login.token).await.unwrap();
    assert_eq!(principal.role, Some(EmployeeRole::SalesRep));
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn balance_ignores_cancelled_orders(pool: PgPool) {
    let state = setup(&pool).await;
    let c = customer(&state, &pool, "40 32 2555", REP_A).await;

    state.order_service.create_order(c, &[item("S10_1678", 2)], None).await.unwrap();
    let cancelled = state.order_service.create_order(c, &[item("S10_2016", 5)], None).await.unwrap();
    state.order_service.cancel_order(&as_customer(c), cancelled).await.unwrap();
    state
        .customer_service
        .record_payment(c, &NewPaymentPayload {
            check_number: "HQ336336".into(),
            amount: Decimal::new(100_00, 2),
        })
        .await
        .unwrap();

    let profile = state.customer_service.get_profile(c).await.unwrap();
    assert_eq!(profile.balance.total_orders, Decimal::new(191_40, 2));
    assert_eq!(profile.balance.total_payments, Decimal::new(100_00, 2));
    assert_eq!(profile.balance.balance, Decimal::new(91_40, 2));

    let rows = state
        .customer_service
        .list_customers_with_balances(&as_employee(MANAGER, EmployeeRole::Manager))
        .await
        .unwrap();
    assert_eq!(rows[0].summary(), profile.balance);
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn duplicate_check_number_is_a_conflict(pool: PgPool) {
    let state = setup(&pool).await;
    let c = customer(&state, &pool, "40 32 2555", REP_A).await;
    let payment = NewPaymentPayload {
        check_number: "HQ336336".into(),
        amount: Decimal::new(10_00, 2),
    };

    state.customer_service.record_payment(c, &payment).await.unwrap();
    assert!(matches!(
        state.customer_service.record_payment(c, &payment).await,
        Err(AppError::Conflict(_))
    ));
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn customer_with_debt_cannot_delete_account(pool: PgPool) {
    let state = setup(&pool).await;
    let c = customer(&state, &pool, "40 32 2555", REP_A).await;
    state.order_service.create_order(c, &[item("S10_1678", 1)], None).await.unwrap();

    let eligibility = state.account_service.deletion_eligibility(c).await.unwrap();
    assert!(!eligibility.eligible);

    let result = state
        .account_service
        .delete_customer(&as_customer(c), c, PASSWORD, true)
        .await;
    assert!(matches!(result, Err(AppError::OutstandingBalance(b)) if b == Decimal::new(95_70, 2)));
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM customers").await, 1);
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn settled_customer_deletion_removes_everything(pool: PgPool) {
    let state = setup(&pool).await;
    let c = customer(&state, &pool, "40 32 2555", REP_A).await;
    state.order_service.create_order(c, &[item("S10_1678", 1)], None).await.unwrap();
    state
        .customer_service
        .record_payment(c, &NewPaymentPayload {
            check_number: "JM555205".into(),
            amount: Decimal::new(95_70, 2),
        })
        .await
        .unwrap();

    let principal = as_customer(c);
    assert!(matches!(
        state.account_service.delete_customer(&principal, c, PASSWORD, false).await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        state.account_service.delete_customer(&principal, c, "wrong-pass", true).await,
        Err(AppError::InvalidCredentials)
    ));

    state.account_service.delete_customer(&principal, c, PASSWORD, true).await.unwrap();

    for table in ["customers", "customer_auth", "orders", "order_details", "payments"] {
        assert_eq!(count(&pool, &format!("SELECT COUNT(*) FROM {table}")).await, 0, "{table}");
    }
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn termination_hands_customers_to_lowest_remaining_rep(pool: PgPool) {
    let state = setup(&pool).await;
    let c1 = customer(&state, &pool, "40 32 2555", REP_B).await;
    let c2 = customer(&state, &pool, "40 32 2556", REP_B).await;
    state
        .employee_service
        .create_report(&as_employee(REP_B, EmployeeRole::SalesRep), "Visitas da semana")
        .await
        .unwrap();

    let manager = as_employee(MANAGER, EmployeeRole::Manager);
    let outcome = state.account_service.terminate_sales_rep(&manager, REP_B).await.unwrap();

    assert_eq!(outcome.replacement, REP_A);
    assert_eq!(outcome.reassigned_customers, 2);
    for c in [c1, c2] {
        let profile = state.customer_service.get_profile(c).await.unwrap();
        assert_eq!(profile.customer.sales_rep_employee_number, Some(REP_A));
    }
    assert_eq!(
        count(&pool, &format!("SELECT COUNT(*) FROM employees WHERE employee_number = {REP_B}")).await,
        0
    );
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM employee_reports").await, 0);
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn only_rep_of_office_cannot_be_terminated(pool: PgPool) {
    let state = setup(&pool).await;
    let c = customer(&state, &pool, "40 32 2555", LONE_REP).await;
    let manager = as_employee(MANAGER, EmployeeRole::Manager);

    let result = state.account_service.terminate_sales_rep(&manager, LONE_REP).await;
    assert!(matches!(result, Err(AppError::NoReplacementRep { ref office_code }) if office_code == "2"));

    let profile = state.customer_service.get_profile(c).await.unwrap();
    assert_eq!(profile.customer.sales_rep_employee_number, Some(LONE_REP));
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn termination_is_manager_only_and_targets_sales_reps(pool: PgPool) {
    let state = setup(&pool).await;

    let rep = as_employee(REP_A, EmployeeRole::SalesRep);
    assert!(matches!(
        state.account_service.terminate_sales_rep(&rep, REP_B).await,
        Err(AppError::Forbidden(_))
    ));

    let manager = as_employee(MANAGER, EmployeeRole::Manager);
    assert!(matches!(
        state.account_service.terminate_sales_rep(&manager, MANAGER).await,
        Err(AppError::Conflict(_))
    ));
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn office_with_employees_cannot_be_deleted(pool: PgPool) {
    let state = setup(&pool).await;
    let president = as_employee(common::PRESIDENT, EmployeeRole::President);

    assert!(matches!(
        state.office_service.delete_office(&president, "2").await,
        Err(AppError::IntegrityViolation(_))
    ));
    assert!(matches!(
        state.office_service.delete_office(&as_employee(MANAGER, EmployeeRole::Manager), "2").await,
        Err(AppError::Forbidden(_))
    ));
}
