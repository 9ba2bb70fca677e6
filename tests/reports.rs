// tests/reports.rs
//
// Rodam quando DATABASE_URL aponta para um Postgres (ver build.rs).

mod common;

use rust_decimal::Decimal;
use sqlx::PgPool;

use classicmodels_backend::{db::ReportRepository, models::report::ReportFilter};
use common::{customer, item, set_status, setup, LONE_REP, REP_A, REP_B};

/// Escritório 1 (San Francisco): um pedido de 2004 em Motorcycles e outro cancelado.
/// Escritório 2 (Boston): um pedido de 2005 em Planes.
/// Escritório 3 (Paris): sem funcionários.
async fn seed_sales(pool: &PgPool) -> ReportRepository {
    let state = setup(pool).await;

    sqlx::query("INSERT INTO product_lines (product_line, text_description) VALUES ('Planes', 'Aviões')")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        r#"
        INSERT INTO products (product_code, product_name, product_line, product_scale, product_vendor,
                              product_description, quantity_in_stock, buy_price, msrp)
        VALUES ('S18_1662', '1980s Black Hawk Helicopter', 'Planes', '1:18', 'Red Start Diecast',
                'Replica', 50, 77.27, 95.70)
        "#,
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        r#"
        INSERT INTO offices (office_code, city, phone, address_line1, country, postal_code, territory)
        VALUES ('3', 'Paris', '+33 14 723 4404', '43 Rue Jouffroy D''abbans', 'France', '75017', 'EMEA')
        "#,
    )
    .execute(pool)
    .await
    .unwrap();

    let west = customer(&state, pool, "40 32 2555", REP_A).await;
    let east = customer(&state, pool, "40 32 2556", LONE_REP).await;

    let shipped = state.order_service.create_order(west, &[item("S10_1678", 2)], None).await.unwrap();
    let cancelled = state.order_service.create_order(west, &[item("S10_2016", 1)], None).await.unwrap();
    let planes = state.order_service.create_order(east, &[item("S18_1662", 3)], None).await.unwrap();
    set_status(pool, shipped, "Shipped").await;
    set_status(pool, cancelled, "Cancelled").await;

    for (order, date) in [(shipped, "2004-06-01"), (cancelled, "2004-07-15"), (planes, "2005-03-01")] {
        sqlx::query("UPDATE orders SET order_date = $2::DATE, required_date = $2::DATE + 7 WHERE order_number = $1")
            .bind(order)
            .bind(date)
            .execute(pool)
            .await
            .unwrap();
    }

    ReportRepository::new(pool.clone())
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn sales_by_office_skips_cancelled_orders_and_applies_filters(pool: PgPool) {
    let reports = seed_sales(&pool).await;

    let all = reports.sales_by_office(&ReportFilter::default()).await.unwrap();
    let rows: Vec<_> = all.iter().map(|r| (r.office_code.as_str(), r.order_count, r.revenue)).collect();
    assert_eq!(rows, vec![("2", 1, money(287_10)), ("1", 1, money(191_40))]);

    let by_city = ReportFilter {
        city: Some("fran".into()),
        ..Default::default()
    };
    let rows = reports.sales_by_office(&by_city).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].city, "San Francisco");

    let by_year = ReportFilter {
        year: Some(2005),
        ..Default::default()
    };
    let rows = reports.sales_by_office(&by_year).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].office_code, "2");

    let by_line = ReportFilter {
        product_line: Some("Motorcycles".into()),
        ..Default::default()
    };
    let rows = reports.sales_by_office(&by_line).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!((rows[0].office_code.as_str(), rows[0].revenue), ("1", money(191_40)));

    let nothing = ReportFilter {
        year: Some(2003),
        ..Default::default()
    };
    assert!(reports.sales_by_office(&nothing).await.unwrap().is_empty());
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn sales_by_product_line_counts_only_valid_units(pool: PgPool) {
    let reports = seed_sales(&pool).await;

    let rows = reports.sales_by_product_line(&ReportFilter::default()).await.unwrap();
    let rows: Vec<_> = rows
        .iter()
        .map(|r| (r.product_line.as_str(), r.units_sold, r.revenue))
        .collect();
    assert_eq!(rows, vec![("Planes", 3, money(287_10)), ("Motorcycles", 2, money(191_40))]);

    let boston = ReportFilter {
        city: Some("BOSTON".into()),
        ..Default::default()
    };
    let rows = reports.sales_by_product_line(&boston).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_line, "Planes");
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn employee_performance_groups_reps_by_year(pool: PgPool) {
    let reports = seed_sales(&pool).await;

    let rows = reports.employee_performance(None).await.unwrap();
    let rows: Vec<_> = rows
        .iter()
        .map(|r| (r.employee_number, r.year, r.order_count, r.revenue))
        .collect();
    assert_eq!(rows, vec![(LONE_REP, 2005, 1, money(287_10)), (REP_A, 2004, 1, money(191_40))]);

    let rows = reports.employee_performance(Some(2004)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].employee_number, REP_A);
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn idle_offices_and_reps_are_listed(pool: PgPool) {
    let reports = seed_sales(&pool).await;

    let offices = reports.offices_without_orders().await.unwrap();
    let codes: Vec<_> = offices.iter().map(|o| o.office_code.as_str()).collect();
    assert_eq!(codes, ["3"]);

    // REP_B não tem clientes; os demais Sales Reps têm pedidos válidos
    let reps = reports.employees_without_orders().await.unwrap();
    let numbers: Vec<_> = reps.iter().map(|e| e.employee_number).collect();
    assert_eq!(numbers, [REP_B]);
}

#[sqlx::test]
#[cfg_attr(not(database_tests), ignore = "requer DATABASE_URL apontando para um Postgres")]
async fn popular_products_rank_by_units_sold(pool: PgPool) {
    let reports = seed_sales(&pool).await;

    let rows = reports.popular_products("Motorcycles").await.unwrap();
    let rows: Vec<_> = rows.iter().map(|p| (p.product_code.as_str(), p.units_sold)).collect();
    // O pedido cancelado de S10_2016 não conta; empate desfeito pelo nome
    assert_eq!(rows, vec![("S10_1678", 2), ("S10_2016", 0), ("S10_4698", 0)]);

    assert!(reports.popular_products("Ships").await.unwrap().is_empty());
}
