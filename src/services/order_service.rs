// src/services/order_service.rs

use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{next_id, IdSequence},
        error::AppError,
    },
    db::{CustomerRepository, OrderRepository},
    models::{
        auth::Principal,
        cart::CartItem,
        order::{
            ItemRemoval, Order, OrderDetail, OrderLine, OrderScope, OrderSort, OrderStatus, AUTO_CANCEL_COMMENT,
            DEFAULT_ORDER_COMMENT, REQUIRED_DATE_DAYS,
        },
    },
};

/// Regra de acesso a pedidos: o cliente só vê os próprios, o Sales Rep
/// só os da sua carteira e o escalão gerencial vê todos.
pub fn can_access_order(principal: &Principal, scope: &OrderScope) -> bool {
    if principal.is_customer() {
        return scope.customer_number == principal.id;
    }
    principal.is_manager_tier() || scope.sales_rep_employee_number == Some(principal.id)
}

/// Cancelamento: o cliente só cancela pedido próprio em andamento; a equipe
/// cancela qualquer pedido acessível que ainda não esteja cancelado.
fn check_cancellable(principal: &Principal, scope: &OrderScope) -> Result<(), AppError> {
    let allowed = if principal.is_customer() {
        scope.status.customer_can_cancel()
    } else {
        scope.status != OrderStatus::Cancelled
    };
    if !allowed {
        return Err(AppError::OrderNotEditable {
            order_number: scope.order_number,
            status: scope.status,
        });
    }
    Ok(())
}

fn ensure_access(principal: &Principal, scope: &OrderScope) -> Result<(), AppError> {
    if !can_access_order(principal, scope) {
        return Err(AppError::Forbidden(format!(
            "Sem acesso ao pedido {}.",
            scope.order_number
        )));
    }
    Ok(())
}

fn ensure_editable(scope: &OrderScope) -> Result<(), AppError> {
    if !scope.status.allows_item_changes() {
        return Err(AppError::OrderNotEditable {
            order_number: scope.order_number,
            status: scope.status,
        });
    }
    Ok(())
}

fn order_not_found(order_number: i32) -> AppError {
    AppError::NotFound(format!("Pedido {order_number} não encontrado."))
}

fn line_not_found(line_id: i64) -> AppError {
    AppError::NotFound(format!("Item {line_id} não encontrado."))
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    customer_repo: CustomerRepository,
    pool: PgPool,
}

impl OrderService {
    pub fn new(order_repo: OrderRepository, customer_repo: CustomerRepository, pool: PgPool) -> Self {
        Self {
            order_repo,
            customer_repo,
            pool,
        }
    }

    // =========================================================================
    //  CRIAÇÃO
    // =========================================================================

    /// Cria o pedido e todas as linhas numa transação só. Qualquer falha
    /// (produto inexistente, por exemplo) desfaz tudo.
    pub async fn create_order(
        &self,
        customer_number: i32,
        items: &[CartItem],
        comment: Option<&str>,
    ) -> Result<i32, AppError> {
        if items.is_empty() {
            return Err(AppError::InvalidInput("O carrinho está vazio.".into()));
        }
        if let Some(item) = items.iter().find(|i| i.quantity < 1) {
            return Err(AppError::InvalidInput(format!(
                "Quantidade inválida para o produto '{}'.",
                item.product_code
            )));
        }

        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_ORDER_COMMENT);
        let order_date = Utc::now().date_naive();
        let required_date = order_date + Duration::days(REQUIRED_DATE_DAYS);

        let mut tx = self.pool.begin().await?;

        let order_number = next_id(&mut *tx, IdSequence::OrderNumber).await?;
        self.order_repo
            .insert_order(&mut *tx, order_number, order_date, required_date, comment, customer_number)
            .await?;

        for (index, item) in items.iter().enumerate() {
            self.order_repo
                .insert_line(
                    &mut *tx,
                    order_number,
                    &item.product_code,
                    item.quantity,
                    item.price_each,
                    index as i32 + 1,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(order_number, customer_number, lines = items.len(), "Pedido criado");
        Ok(order_number)
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn get_order_detail(&self, principal: &Principal, order_number: i32) -> Result<OrderDetail, AppError> {
        let scope = self
            .order_repo
            .find_scope(&self.pool, order_number, false)
            .await?
            .ok_or_else(|| order_not_found(order_number))?;
        ensure_access(principal, &scope)?;

        let header = self
            .order_repo
            .find_order(order_number)
            .await?
            .ok_or_else(|| order_not_found(order_number))?;
        let items = self.order_repo.list_lines(order_number).await?;

        Ok(OrderDetail::new(header, items))
    }

    /// Pedidos visíveis ao principal: os próprios (cliente), os da carteira
    /// (Sales Rep) ou todos (escalão gerencial).
    pub async fn list_orders(&self, principal: &Principal, sort: OrderSort) -> Result<Vec<Order>, AppError> {
        if principal.is_customer() {
            self.order_repo.list_for_customer(principal.id, sort).await
        } else if principal.is_manager_tier() {
            self.order_repo.list_all(sort).await
        } else {
            self.order_repo.list_for_sales_rep(principal.id, sort).await
        }
    }

    pub async fn list_customer_orders(
        &self,
        principal: &Principal,
        customer_number: i32,
        sort: OrderSort,
    ) -> Result<Vec<Order>, AppError> {
        let customer = self
            .customer_repo
            .find_by_id(customer_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cliente {customer_number} não encontrado.")))?;

        let allowed = match principal.customer_id() {
            Some(own) => own == customer_number,
            None => principal.is_manager_tier() || customer.sales_rep_employee_number == Some(principal.id),
        };
        if !allowed {
            return Err(AppError::Forbidden(format!(
                "Sem acesso aos pedidos do cliente {customer_number}."
            )));
        }

        self.order_repo.list_for_customer(customer_number, sort).await
    }

    // =========================================================================
    //  MUTAÇÕES (pedido travado com FOR UPDATE)
    // =========================================================================

    pub async fn update_item_quantity(&self, principal: &Principal, line_id: i64, quantity: i32) -> Result<OrderLine, AppError> {
        if quantity < 1 {
            return Err(AppError::InvalidInput("A quantidade deve ser no mínimo 1.".into()));
        }

        let mut tx = self.pool.begin().await?;

        let scope = self
            .order_repo
            .lock_scope_by_line(&mut *tx, line_id)
            .await?
            .ok_or_else(|| line_not_found(line_id))?;
        ensure_access(principal, &scope)?;
        ensure_editable(&scope)?;

        self.order_repo.update_line_quantity(&mut *tx, line_id, quantity).await?;
        let line = self
            .order_repo
            .find_line(&mut *tx, line_id)
            .await?
            .ok_or_else(|| line_not_found(line_id))?;

        tx.commit().await?;

        tracing::info!(order_number = scope.order_number, line_id, quantity, "Quantidade do item atualizada");
        Ok(line)
    }

    /// Remove a linha e renumera as seguintes. Se o pedido ficar vazio,
    /// ele é cancelado automaticamente na mesma transação.
    pub async fn delete_item(&self, principal: &Principal, line_id: i64) -> Result<(i32, ItemRemoval), AppError> {
        let mut tx = self.pool.begin().await?;

        let scope = self
            .order_repo
            .lock_scope_by_line(&mut *tx, line_id)
            .await?
            .ok_or_else(|| line_not_found(line_id))?;
        ensure_access(principal, &scope)?;
        ensure_editable(&scope)?;

        let line = self
            .order_repo
            .find_line(&mut *tx, line_id)
            .await?
            .ok_or_else(|| line_not_found(line_id))?;

        self.order_repo.delete_line(&mut *tx, line_id).await?;
        self.order_repo
            .renumber_after(&mut *tx, scope.order_number, line.order_line_number)
            .await?;

        let remaining = self.order_repo.count_lines(&mut *tx, scope.order_number).await?;
        let outcome = if remaining == 0 {
            self.order_repo
                .cancel(&mut *tx, scope.order_number, Some(AUTO_CANCEL_COMMENT))
                .await?;
            ItemRemoval::RemovedAndOrderCancelled
        } else {
            ItemRemoval::Removed
        };

        tx.commit().await?;

        tracing::info!(order_number = scope.order_number, line_id, ?outcome, "Item removido do pedido");
        Ok((scope.order_number, outcome))
    }

    pub async fn cancel_order(&self, principal: &Principal, order_number: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let scope = self
            .order_repo
            .find_scope(&mut *tx, order_number, true)
            .await?
            .ok_or_else(|| order_not_found(order_number))?;
        ensure_access(principal, &scope)?;
        check_cancellable(principal, &scope)?;

        self.order_repo.cancel(&mut *tx, order_number, None).await?;
        tx.commit().await?;

        tracing::info!(order_number, by = principal.id, "Pedido cancelado");
        Ok(())
    }

    /// Nota interna da equipe; vale para qualquer status.
    pub async fn update_comment(&self, principal: &Principal, order_number: i32, comment: &str) -> Result<(), AppError> {
        if !principal.is_staff() {
            return Err(AppError::Forbidden("Apenas funcionários editam a nota do pedido.".into()));
        }

        let scope = self
            .order_repo
            .find_scope(&self.pool, order_number, false)
            .await?
            .ok_or_else(|| order_not_found(order_number))?;
        ensure_access(principal, &scope)?;

        self.order_repo.set_comment(order_number, comment.trim()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{EmployeeRole, PrincipalKind};
    use uuid::Uuid;

    fn customer(id: i32) -> Principal {
        Principal {
            kind: PrincipalKind::Customer,
            id,
            role: None,
            session_id: Uuid::new_v4(),
        }
    }

    fn employee(id: i32, role: EmployeeRole) -> Principal {
        Principal {
            kind: PrincipalKind::Employee,
            id,
            role: Some(role),
            session_id: Uuid::new_v4(),
        }
    }

    fn scope(status: OrderStatus) -> OrderScope {
        OrderScope {
            order_number: 10100,
            customer_number: 363,
            status,
            sales_rep_employee_number: Some(1216),
        }
    }

    #[test]
    fn customer_accesses_only_own_orders() {
        assert!(can_access_order(&customer(363), &scope(OrderStatus::Shipped)));
        assert!(!can_access_order(&customer(103), &scope(OrderStatus::Shipped)));
    }

    #[test]
    fn sales_rep_accesses_only_assigned_customers() {
        assert!(can_access_order(&employee(1216, EmployeeRole::SalesRep), &scope(OrderStatus::InProcess)));
        assert!(!can_access_order(&employee(1165, EmployeeRole::SalesRep), &scope(OrderStatus::InProcess)));
    }

    #[test]
    fn manager_tier_accesses_everything() {
        assert!(can_access_order(&employee(1143, EmployeeRole::Manager), &scope(OrderStatus::InProcess)));
        assert!(can_access_order(&employee(1002, EmployeeRole::President), &scope(OrderStatus::Disputed)));
    }

    #[test]
    fn customer_number_never_matches_an_employee_scope() {
        // Cliente 1216 não vira Sales Rep 1216 por coincidência de número
        let mut s = scope(OrderStatus::InProcess);
        s.customer_number = 500;
        assert!(!can_access_order(&customer(1216), &s));
    }

    #[test]
    fn customer_cancels_only_in_process_orders() {
        let c = customer(363);
        assert!(check_cancellable(&c, &scope(OrderStatus::InProcess)).is_ok());
        assert!(matches!(
            check_cancellable(&c, &scope(OrderStatus::Shipped)),
            Err(AppError::OrderNotEditable { status: OrderStatus::Shipped, .. })
        ));
    }

    #[test]
    fn staff_cancels_any_status_except_already_cancelled() {
        let rep = employee(1216, EmployeeRole::SalesRep);
        assert!(check_cancellable(&rep, &scope(OrderStatus::OnHold)).is_ok());
        assert!(check_cancellable(&rep, &scope(OrderStatus::Cancelled)).is_err());
    }

    #[test]
    fn items_are_editable_only_in_process() {
        assert!(ensure_editable(&scope(OrderStatus::InProcess)).is_ok());
        assert!(ensure_editable(&scope(OrderStatus::Resolved)).is_err());
    }
}
