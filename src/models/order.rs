// src/models/order.rs

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// --- Enums ---

// Mapeia o CREATE TYPE order_status do banco.
// Só "In Process" é mutável; os demais chegam pelos dados históricos
// ou por processos externos (expedição).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status")]
pub enum OrderStatus {
    #[sqlx(rename = "In Process")]
    #[serde(rename = "In Process")]
    InProcess,
    Shipped,
    Cancelled,
    Resolved,
    #[sqlx(rename = "On Hold")]
    #[serde(rename = "On Hold")]
    OnHold,
    Disputed,
}

impl OrderStatus {
    /// Itens (quantidade, exclusão) só mudam enquanto o pedido está "In Process".
    pub fn allows_item_changes(self) -> bool {
        self == OrderStatus::InProcess
    }

    /// Cancelamento pedido pelo próprio cliente.
    pub fn customer_can_cancel(self) -> bool {
        self == OrderStatus::InProcess
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::InProcess => "In Process",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Resolved => "Resolved",
            OrderStatus::OnHold => "On Hold",
            OrderStatus::Disputed => "Disputed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_ORDER_COMMENT: &str = "Web Order";
pub const AUTO_CANCEL_COMMENT: &str = "Auto-cancelled: All items removed.";
pub const REQUIRED_DATE_DAYS: i64 = 7;

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: i32,
    pub order_date: NaiveDate,
    pub required_date: NaiveDate,
    pub shipped_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub comments: Option<String>,
    pub customer_number: i32,
}

// Linha do pedido já com o nome do produto
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: i64,
    pub order_number: i32,
    pub product_code: String,
    pub product_name: String,
    pub quantity_ordered: i32,
    pub price_each: Decimal,
    pub order_line_number: i32,
}

impl OrderLine {
    pub fn line_total(&self) -> Decimal {
        self.price_each * Decimal::from(self.quantity_ordered)
    }
}

/// Pedido + dono + Sales Rep do dono, usado nas checagens de acesso.
#[derive(Debug, Clone, FromRow)]
pub struct OrderScope {
    pub order_number: i32,
    pub customer_number: i32,
    pub status: OrderStatus,
    pub sales_rep_employee_number: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: Order,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
}

impl OrderDetail {
    pub fn new(header: Order, items: Vec<OrderLine>) -> Self {
        let total = items.iter().map(OrderLine::line_total).sum();
        Self { header, items, total }
    }
}

/// Resultado da remoção de um item: o chamador precisa saber
/// se o pedido foi cancelado automaticamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemRemoval {
    Removed,
    RemovedAndOrderCancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSort {
    #[default]
    Newest,
    Oldest,
    Status,
    Number,
}

impl OrderSort {
    pub fn order_by(self) -> &'static str {
        match self {
            OrderSort::Newest => "order_date DESC, order_number DESC",
            OrderSort::Oldest => "order_date ASC, order_number ASC",
            OrderSort::Status => "status ASC, order_date DESC",
            OrderSort::Number => "order_number ASC",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub sort: OrderSort,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuantityPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentPayload {
    #[validate(length(max = 2000, message = "Comentário com até 2000 caracteres."))]
    pub comment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRemovalResponse {
    pub order_number: i32,
    pub outcome: ItemRemoval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_in_process_orders_accept_item_changes() {
        assert!(OrderStatus::InProcess.allows_item_changes());
        for status in [
            OrderStatus::Shipped,
            OrderStatus::Cancelled,
            OrderStatus::Resolved,
            OrderStatus::OnHold,
            OrderStatus::Disputed,
        ] {
            assert!(!status.allows_item_changes(), "{status} deveria bloquear");
            assert!(!status.customer_can_cancel(), "{status} deveria bloquear");
        }
    }

    #[test]
    fn status_serializes_with_its_database_label() {
        let json = serde_json::to_string(&OrderStatus::InProcess).unwrap();
        assert_eq!(json, "\"In Process\"");
        assert_eq!(OrderStatus::OnHold.to_string(), "On Hold");
    }

    #[test]
    fn order_total_is_sum_of_line_totals() {
        let header = Order {
            order_number: 10426,
            order_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            required_date: NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(),
            shipped_date: None,
            status: OrderStatus::InProcess,
            comments: Some(DEFAULT_ORDER_COMMENT.into()),
            customer_number: 103,
        };
        let line = |id: i64, qty: i32, cents: i64| OrderLine {
            id,
            order_number: 10426,
            product_code: format!("S10_{id}"),
            product_name: "Model".into(),
            quantity_ordered: qty,
            price_each: Decimal::new(cents, 2),
            order_line_number: id as i32,
        };
        let detail = OrderDetail::new(header, vec![line(1, 2, 95_70), line(2, 3, 10_05)]);
        assert_eq!(detail.total, Decimal::new(221_55, 2));
    }

    #[test]
    fn default_sort_is_newest_first() {
        assert_eq!(OrderSort::default(), OrderSort::Newest);
        assert!(OrderSort::Newest.order_by().starts_with("order_date DESC"));
    }
}
