// tests/common/mod.rs

#![allow(dead_code)]

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use classicmodels_backend::{
    common::db_utils::sync_id_sequences,
    config::{AppState, Config},
    models::{
        auth::{EmployeeRole, Principal, PrincipalKind},
        cart::CartItem,
        customer::SignupPayload,
    },
};

pub const PASSWORD: &str = "secret1";

// Escritório 1: dois Sales Reps (1165, 1166) sob o gerente 1143.
// Escritório 2: um Sales Rep sozinho (1501).
pub const PRESIDENT: i32 = 1002;
pub const MANAGER: i32 = 1143;
pub const REP_A: i32 = 1165;
pub const REP_B: i32 = 1166;
pub const LONE_REP: i32 = 1501;

pub fn config() -> Config {
    Config {
        database_url: String::new(),
        jwt_secret: "integration-secret".into(),
        bind_addr: "127.0.0.1:0".into(),
        db_max_connections: 5,
        bcrypt_cost: 4,
    }
}

pub async fn setup(pool: &PgPool) -> AppState {
    seed(pool).await;
    sync_id_sequences(pool).await.unwrap();
    AppState::from_pool(pool.clone(), &config()).unwrap()
}

async fn seed(pool: &PgPool) {
    sqlx::query(
        r#"
        INSERT INTO offices (office_code, city, phone, address_line1, country, postal_code, territory)
        VALUES ('1', 'San Francisco', '+1 650 219 4782', '100 Market Street', 'USA', '94080', 'NA'),
               ('2', 'Boston', '+1 215 837 0825', '1550 Court Place', 'USA', '02107', 'NA')
        "#,
    )
    .execute(pool)
    .await
    .unwrap();

    let employees = [
        (PRESIDENT, "Murphy", "Diane", "1", None, "President", EmployeeRole::President),
        (MANAGER, "Bow", "Anthony", "1", Some(PRESIDENT), "Sales Manager (NA)", EmployeeRole::Manager),
        (REP_A, "Jennings", "Leslie", "1", Some(MANAGER), "Sales Rep", EmployeeRole::SalesRep),
        (REP_B, "Thompson", "Leslie", "1", Some(MANAGER), "Sales Rep", EmployeeRole::SalesRep),
        (LONE_REP, "Bott", "Larry", "2", Some(MANAGER), "Sales Rep", EmployeeRole::SalesRep),
    ];
    let hashed = bcrypt::hash(PASSWORD, 4).unwrap();
    for (number, last, first, office, reports_to, title, role) in employees {
        sqlx::query(
            r#"
            INSERT INTO employees (employee_number, last_name, first_name, extension, email,
                                   office_code, reports_to, job_title, role)
            VALUES ($1, $2, $3, 'x100', 'staff@classicmodelcars.com', $4, $5, $6, $7)
            "#,
        )
        .bind(number)
        .bind(last)
        .bind(first)
        .bind(office)
        .bind(reports_to)
        .bind(title)
        .bind(role)
        .execute(pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO employee_auth (employee_number, hashed_password) VALUES ($1, $2)")
            .bind(number)
            .bind(&hashed)
            .execute(pool)
            .await
            .unwrap();
    }

    sqlx::query("INSERT INTO product_lines (product_line, text_description) VALUES ('Motorcycles', 'Bikes')")
        .execute(pool)
        .await
        .unwrap();

    for (code, name, stock) in [
        ("S10_1678", "1969 Harley Davidson Ultimate Chopper", 50),
        ("S10_2016", "1996 Moto Guzzi 1100i", 50),
        ("S10_4698", "2003 Harley-Davidson Eagle Drag Bike", 50),
    ] {
        sqlx::query(
            r#"
            INSERT INTO products (product_code, product_name, product_line, product_scale, product_vendor,
                                  product_description, quantity_in_stock, buy_price, msrp)
            VALUES ($1, $2, 'Motorcycles', '1:10', 'Min Lin Diecast', 'Replica', $3, 48.81, 95.70)
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(stock)
        .execute(pool)
        .await
        .unwrap();
    }
}

/// Cadastra um cliente e o atribui ao Sales Rep informado.
pub async fn customer(state: &AppState, pool: &PgPool, phone: &str, rep: i32) -> i32 {
    let number = state
        .customer_service
        .signup(&SignupPayload {
            contact_first_name: "Jean".into(),
            contact_last_name: "King".into(),
            customer_name: "Atelier graphique".into(),
            phone: phone.into(),
            address_line1: "54, rue Royale".into(),
            city: "Nantes".into(),
            country: "France".into(),
            password: PASSWORD.into(),
        })
        .await
        .unwrap();

    sqlx::query("UPDATE customers SET sales_rep_employee_number = $2 WHERE customer_number = $1")
        .bind(number)
        .bind(rep)
        .execute(pool)
        .await
        .unwrap();
    number
}

pub fn as_customer(id: i32) -> Principal {
    Principal {
        kind: PrincipalKind::Customer,
        id,
        role: None,
        session_id: Uuid::new_v4(),
    }
}

pub fn as_employee(id: i32, role: EmployeeRole) -> Principal {
    Principal {
        kind: PrincipalKind::Employee,
        id,
        role: Some(role),
        session_id: Uuid::new_v4(),
    }
}

pub fn item(code: &str, quantity: i32) -> CartItem {
    CartItem {
        product_code: code.into(),
        product_name: code.into(),
        quantity,
        price_each: Decimal::new(95_70, 2),
    }
}

pub async fn set_status(pool: &PgPool, order_number: i32, status: &str) {
    sqlx::query("UPDATE orders SET status = $2::order_status WHERE order_number = $1")
        .bind(order_number)
        .bind(status)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await.unwrap()
}
