// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::auth::Principal};

/// 1. O Trait que define um portão de papel
pub trait RoleGate: Send + Sync + 'static {
    fn allows(principal: &Principal) -> bool;
    fn denial() -> &'static str;
}

/// 2. O Extractor (Guardião). Entrega o principal já aprovado.
pub struct RequireRole<T>(pub Principal, PhantomData<T>);

impl<T> RequireRole<T> {
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleGate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai o principal (colocado pelo auth_guard)
        let principal = parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        // B. Confere o papel
        if !T::allows(&principal) {
            return Err(AppError::Forbidden(T::denial().into()));
        }

        Ok(RequireRole(principal, PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PORTÕES (TIPOS)
// ---

pub struct CustomerOnly;
impl RoleGate for CustomerOnly {
    fn allows(principal: &Principal) -> bool { principal.is_customer() }
    fn denial() -> &'static str { "Área restrita a clientes." }
}

pub struct StaffOnly;
impl RoleGate for StaffOnly {
    fn allows(principal: &Principal) -> bool { principal.is_staff() }
    fn denial() -> &'static str { "Área restrita a funcionários." }
}

pub struct ManagerTier;
impl RoleGate for ManagerTier {
    fn allows(principal: &Principal) -> bool { principal.is_manager_tier() }
    fn denial() -> &'static str { "Área restrita a gerentes, vice-presidentes e presidente." }
}

pub struct PresidentOnly;
impl RoleGate for PresidentOnly {
    fn allows(principal: &Principal) -> bool { principal.is_president() }
    fn denial() -> &'static str { "Área restrita ao Presidente." }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{EmployeeRole, PrincipalKind};
    use axum::http::Request;
    use uuid::Uuid;

    fn principal(kind: PrincipalKind, role: Option<EmployeeRole>) -> Principal {
        Principal {
            kind,
            id: 1,
            role,
            session_id: Uuid::new_v4(),
        }
    }

    fn parts_with(principal: Option<Principal>) -> Parts {
        let (mut parts, _) = Request::new(()).into_parts();
        if let Some(p) = principal {
            parts.extensions.insert(p);
        }
        parts
    }

    #[test]
    fn gates_follow_principal_roles() {
        let customer = principal(PrincipalKind::Customer, None);
        let rep = principal(PrincipalKind::Employee, Some(EmployeeRole::SalesRep));
        let vp = principal(PrincipalKind::Employee, Some(EmployeeRole::VicePresident));
        let president = principal(PrincipalKind::Employee, Some(EmployeeRole::President));

        assert!(CustomerOnly::allows(&customer) && !CustomerOnly::allows(&rep));
        assert!(StaffOnly::allows(&rep) && !StaffOnly::allows(&customer));
        assert!(ManagerTier::allows(&vp) && !ManagerTier::allows(&rep));
        assert!(PresidentOnly::allows(&president) && !PresidentOnly::allows(&vp));
    }

    #[tokio::test]
    async fn extractor_rejects_wrong_role_with_forbidden() {
        let mut parts = parts_with(Some(principal(PrincipalKind::Customer, None)));
        let result = RequireRole::<StaffOnly>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn extractor_without_principal_is_unauthenticated() {
        let mut parts = parts_with(None);
        let result = RequireRole::<CustomerOnly>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn extractor_hands_back_the_approved_principal() {
        let mut parts = parts_with(Some(principal(PrincipalKind::Employee, Some(EmployeeRole::Manager))));
        let guard = RequireRole::<ManagerTier>::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(guard.principal().role, Some(EmployeeRole::Manager));
    }
}
