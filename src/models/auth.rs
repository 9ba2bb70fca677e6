// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{customer::Customer, employee::Employee};

// Tipo do principal autenticado (cliente ou funcionário)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Customer,
    Employee,
}

// Mapeia o CREATE TYPE employee_role do banco.
// O papel é explícito, definido na criação do funcionário; o cargo
// (job_title) continua sendo só texto livre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeRole {
    SalesRep,
    Manager,
    VicePresident,
    President,
}

impl EmployeeRole {
    /// Tudo que não é Sales Rep enxerga a carteira inteira.
    pub fn is_manager_tier(self) -> bool {
        !matches!(self, EmployeeRole::SalesRep)
    }
}

/// O principal da requisição, montado a partir do token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub kind: PrincipalKind,
    pub id: i32,
    pub role: Option<EmployeeRole>,
    pub session_id: Uuid,
}

impl Principal {
    pub fn is_customer(&self) -> bool {
        self.kind == PrincipalKind::Customer
    }

    pub fn is_staff(&self) -> bool {
        self.kind == PrincipalKind::Employee
    }

    pub fn is_manager_tier(&self) -> bool {
        self.is_staff() && self.role.is_some_and(EmployeeRole::is_manager_tier)
    }

    pub fn is_president(&self) -> bool {
        self.is_staff() && self.role == Some(EmployeeRole::President)
    }

    pub fn customer_id(&self) -> Option<i32> {
        self.is_customer().then_some(self.id)
    }

    pub fn employee_id(&self) -> Option<i32> {
        self.is_staff().then_some(self.id)
    }
}

// Perfil completo devolvido após a verificação de credenciais
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "profile", rename_all = "lowercase")]
pub enum Profile {
    Customer(Customer),
    Employee(Employee),
}

impl Profile {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Profile::Customer(_) => PrincipalKind::Customer,
            Profile::Employee(_) => PrincipalKind::Employee,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Profile::Customer(c) => c.customer_number,
            Profile::Employee(e) => e.employee_number,
        }
    }

    pub fn role(&self) -> Option<EmployeeRole> {
        match self {
            Profile::Customer(_) => None,
            Profile::Employee(e) => Some(e.role),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Profile::Customer(c) => &c.contact_first_name,
            Profile::Employee(e) => &e.first_name,
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    pub kind: PrincipalKind,
    #[validate(range(min = 1, message = "Informe um número válido."))]
    pub number: i32,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub kind: PrincipalKind,
    pub number: i32,
    pub display_name: String,
    pub role: Option<EmployeeRole>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "Informe a senha atual."))]
    pub old_password: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "As senhas não conferem."))]
    pub confirm_password: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,                   // Número do cliente ou do funcionário
    pub kind: PrincipalKind,
    pub role: Option<EmployeeRole>,
    pub sid: Uuid,                  // Id da sessão (chave do carrinho)
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(role: EmployeeRole) -> Principal {
        Principal {
            kind: PrincipalKind::Employee,
            id: 1002,
            role: Some(role),
            session_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn only_sales_rep_is_outside_manager_tier() {
        assert!(!EmployeeRole::SalesRep.is_manager_tier());
        assert!(EmployeeRole::Manager.is_manager_tier());
        assert!(EmployeeRole::VicePresident.is_manager_tier());
        assert!(EmployeeRole::President.is_manager_tier());
    }

    #[test]
    fn customer_principal_has_no_staff_capabilities() {
        let customer = Principal {
            kind: PrincipalKind::Customer,
            id: 103,
            role: None,
            session_id: Uuid::new_v4(),
        };
        assert!(!customer.is_staff());
        assert!(!customer.is_manager_tier());
        assert_eq!(customer.customer_id(), Some(103));
        assert_eq!(customer.employee_id(), None);
    }

    #[test]
    fn president_is_also_manager_tier() {
        let p = staff(EmployeeRole::President);
        assert!(p.is_president());
        assert!(p.is_manager_tier());
        assert!(!staff(EmployeeRole::SalesRep).is_manager_tier());
    }

    #[test]
    fn password_confirmation_must_match() {
        let payload = ChangePasswordPayload {
            old_password: "old-secret".into(),
            new_password: "new-secret".into(),
            confirm_password: "typo-secret".into(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }
}
