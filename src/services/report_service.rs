// src/services/report_service.rs

use std::future::Future;

use crate::{
    common::error::AppError,
    db::ReportRepository,
    models::{
        office::Office,
        report::{EmployeePerformance, IdleEmployee, OfficeSales, PopularProduct, ProductLineSales, ReportFilter},
    },
};

// Relatórios são consultas de uma instrução só: em caso de erro,
// registra no log e devolve lista vazia em vez de propagar.
async fn or_empty<T>(report: &'static str, query: impl Future<Output = Result<Vec<T>, AppError>>) -> Vec<T> {
    match query.await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(report, "Falha na consulta do relatório: {:?}", e);
            Vec::new()
        }
    }
}

#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
}

impl ReportService {
    pub fn new(report_repo: ReportRepository) -> Self {
        Self { report_repo }
    }

    pub async fn sales_by_office(&self, filter: &ReportFilter) -> Vec<OfficeSales> {
        or_empty("sales_by_office", self.report_repo.sales_by_office(filter)).await
    }

    pub async fn sales_by_product_line(&self, filter: &ReportFilter) -> Vec<ProductLineSales> {
        or_empty("sales_by_product_line", self.report_repo.sales_by_product_line(filter)).await
    }

    pub async fn employee_performance(&self, year: Option<i32>) -> Vec<EmployeePerformance> {
        or_empty("employee_performance", self.report_repo.employee_performance(year)).await
    }

    pub async fn offices_without_orders(&self) -> Vec<Office> {
        or_empty("offices_without_orders", self.report_repo.offices_without_orders()).await
    }

    pub async fn employees_without_orders(&self) -> Vec<IdleEmployee> {
        or_empty("employees_without_orders", self.report_repo.employees_without_orders()).await
    }

    pub async fn popular_products(&self, product_line: &str) -> Vec<PopularProduct> {
        or_empty("popular_products", self.report_repo.popular_products(product_line)).await
    }
}
