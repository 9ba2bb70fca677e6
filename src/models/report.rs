// src/models/report.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Filtros repassados como vieram: substring da cidade, ano, linha de produto
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub city: Option<String>,
    pub year: Option<i32>,
    pub product_line: Option<String>,
}

impl ReportFilter {
    /// Padrão ILIKE para a cidade (None = sem filtro).
    pub fn city_pattern(&self) -> Option<String> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| format!("%{}%", c.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")))
    }

    pub fn product_line(&self) -> Option<&str> {
        self.product_line.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OfficeSales {
    pub office_code: String,
    pub city: String,
    pub country: String,
    pub order_count: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductLineSales {
    pub product_line: String,
    pub order_count: i64,
    pub units_sold: i64,
    pub revenue: Decimal,
}

// Linha da matriz de desempenho (Sales Rep x ano)
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePerformance {
    pub employee_number: i32,
    pub first_name: String,
    pub last_name: String,
    pub office_code: String,
    pub year: i32,
    pub order_count: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IdleEmployee {
    pub employee_number: i32,
    pub first_name: String,
    pub last_name: String,
    pub office_code: String,
    pub job_title: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PopularProduct {
    pub product_code: String,
    pub product_name: String,
    pub msrp: Decimal,
    pub units_sold: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_pattern_escapes_wildcards() {
        let filter = ReportFilter {
            city: Some(" San_Fran% ".into()),
            ..Default::default()
        };
        assert_eq!(filter.city_pattern().as_deref(), Some("%San\\_Fran\\%%"));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let filter = ReportFilter {
            city: Some("  ".into()),
            year: None,
            product_line: Some("".into()),
        };
        assert_eq!(filter.city_pattern(), None);
        assert_eq!(filter.product_line(), None);
    }
}
