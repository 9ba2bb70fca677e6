// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    config::AppState,
    middleware::rbac::{ManagerTier, RequireRole},
    models::{
        office::Office,
        report::{EmployeePerformance, IdleEmployee, OfficeSales, ProductLineSales, ReportFilter, YearQuery},
    },
};

// Relatórios gerenciais. Falhas de consulta viram lista vazia no serviço.

pub async fn sales_by_office(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerTier>,
    Query(filter): Query<ReportFilter>,
) -> Json<Vec<OfficeSales>> {
    Json(app_state.report_service.sales_by_office(&filter).await)
}

pub async fn sales_by_product_line(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerTier>,
    Query(filter): Query<ReportFilter>,
) -> Json<Vec<ProductLineSales>> {
    Json(app_state.report_service.sales_by_product_line(&filter).await)
}

pub async fn employee_performance(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerTier>,
    Query(query): Query<YearQuery>,
) -> Json<Vec<EmployeePerformance>> {
    Json(app_state.report_service.employee_performance(query.year).await)
}

pub async fn offices_without_orders(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerTier>,
) -> Json<Vec<Office>> {
    Json(app_state.report_service.offices_without_orders().await)
}

pub async fn employees_without_orders(
    State(app_state): State<AppState>,
    _guard: RequireRole<ManagerTier>,
) -> Json<Vec<IdleEmployee>> {
    Json(app_state.report_service.employees_without_orders().await)
}
