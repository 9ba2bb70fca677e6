// src/db/report_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        office::Office,
        report::{EmployeePerformance, IdleEmployee, OfficeSales, PopularProduct, ProductLineSales, ReportFilter},
    },
};

// Filtros opcionais: $1 cidade (ILIKE), $2 ano, $3 linha de produto.
// Pedidos cancelados nunca entram na conta.
const SALES_FILTER: &str = r#"
    o.status <> 'Cancelled'
    AND ($1::TEXT IS NULL OR off.city ILIKE $1)
    AND ($2::INTEGER IS NULL OR EXTRACT(YEAR FROM o.order_date)::INTEGER = $2)
    AND ($3::TEXT IS NULL OR p.product_line = $3)
"#;

const SALES_JOINS: &str = r#"
    FROM offices off
    JOIN employees e ON e.office_code = off.office_code
    JOIN customers c ON c.sales_rep_employee_number = e.employee_number
    JOIN orders o ON o.customer_number = c.customer_number
    JOIN order_details d ON d.order_number = o.order_number
    JOIN products p ON p.product_code = d.product_code
"#;

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn sales_by_office(&self, filter: &ReportFilter) -> Result<Vec<OfficeSales>, AppError> {
        let sql = format!(
            r#"
            SELECT off.office_code, off.city, off.country,
                   COUNT(DISTINCT o.order_number) AS order_count,
                   SUM(d.quantity_ordered * d.price_each)::NUMERIC(14,2) AS revenue
            {SALES_JOINS}
            WHERE {SALES_FILTER}
            GROUP BY off.office_code, off.city, off.country
            ORDER BY revenue DESC
            "#
        );
        let rows = sqlx::query_as::<_, OfficeSales>(&sql)
            .bind(filter.city_pattern())
            .bind(filter.year)
            .bind(filter.product_line())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn sales_by_product_line(&self, filter: &ReportFilter) -> Result<Vec<ProductLineSales>, AppError> {
        let sql = format!(
            r#"
            SELECT p.product_line,
                   COUNT(DISTINCT o.order_number) AS order_count,
                   SUM(d.quantity_ordered)::BIGINT AS units_sold,
                   SUM(d.quantity_ordered * d.price_each)::NUMERIC(14,2) AS revenue
            {SALES_JOINS}
            WHERE {SALES_FILTER}
            GROUP BY p.product_line
            ORDER BY revenue DESC
            "#
        );
        let rows = sqlx::query_as::<_, ProductLineSales>(&sql)
            .bind(filter.city_pattern())
            .bind(filter.year)
            .bind(filter.product_line())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Matriz Sales Rep x ano. `year = None` traz todos os anos.
    pub async fn employee_performance(&self, year: Option<i32>) -> Result<Vec<EmployeePerformance>, AppError> {
        let rows = sqlx::query_as::<_, EmployeePerformance>(
            r#"
            SELECT e.employee_number, e.first_name, e.last_name, e.office_code,
                   EXTRACT(YEAR FROM o.order_date)::INTEGER AS year,
                   COUNT(DISTINCT o.order_number) AS order_count,
                   SUM(d.quantity_ordered * d.price_each)::NUMERIC(14,2) AS revenue
            FROM employees e
            JOIN customers c ON c.sales_rep_employee_number = e.employee_number
            JOIN orders o ON o.customer_number = c.customer_number
            JOIN order_details d ON d.order_number = o.order_number
            WHERE e.role = 'SALES_REP'
              AND o.status <> 'Cancelled'
              AND ($1::INTEGER IS NULL OR EXTRACT(YEAR FROM o.order_date)::INTEGER = $1)
            GROUP BY e.employee_number, e.first_name, e.last_name, e.office_code, year
            ORDER BY year DESC, revenue DESC
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn offices_without_orders(&self) -> Result<Vec<Office>, AppError> {
        let rows = sqlx::query_as::<_, Office>(
            r#"
            SELECT off.office_code, off.city, off.phone, off.address_line1, off.address_line2,
                   off.state, off.country, off.postal_code, off.territory
            FROM offices off
            WHERE NOT EXISTS (
                SELECT 1
                FROM employees e
                JOIN customers c ON c.sales_rep_employee_number = e.employee_number
                JOIN orders o ON o.customer_number = c.customer_number
                WHERE e.office_code = off.office_code AND o.status <> 'Cancelled'
            )
            ORDER BY off.office_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Sales Reps cuja carteira não tem nenhum pedido válido.
    pub async fn employees_without_orders(&self) -> Result<Vec<IdleEmployee>, AppError> {
        let rows = sqlx::query_as::<_, IdleEmployee>(
            r#"
            SELECT e.employee_number, e.first_name, e.last_name, e.office_code, e.job_title
            FROM employees e
            WHERE e.role = 'SALES_REP'
              AND NOT EXISTS (
                SELECT 1
                FROM customers c
                JOIN orders o ON o.customer_number = c.customer_number
                WHERE c.sales_rep_employee_number = e.employee_number AND o.status <> 'Cancelled'
              )
            ORDER BY e.employee_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn popular_products(&self, product_line: &str) -> Result<Vec<PopularProduct>, AppError> {
        let rows = sqlx::query_as::<_, PopularProduct>(
            r#"
            SELECT p.product_code, p.product_name, p.msrp,
                   COALESCE(SUM(d.quantity_ordered) FILTER (WHERE o.status <> 'Cancelled'), 0)::BIGINT AS units_sold
            FROM products p
            LEFT JOIN order_details d ON d.product_code = p.product_code
            LEFT JOIN orders o ON o.order_number = d.order_number
            WHERE p.product_line = $1
            GROUP BY p.product_code, p.product_name, p.msrp
            ORDER BY units_sold DESC, p.product_name
            "#,
        )
        .bind(product_line)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
