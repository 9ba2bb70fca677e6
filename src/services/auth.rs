// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AuthRepository, CustomerRepository, EmployeeRepository},
    models::auth::{AuthResponse, ChangePasswordPayload, Claims, LoginPayload, Principal, PrincipalKind, Profile},
    services::cart_service::CartStore,
};

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    auth_repo: AuthRepository,
    customer_repo: CustomerRepository,
    employee_repo: EmployeeRepository,
    cart_store: CartStore,
    jwt_secret: String,
    bcrypt_cost: u32,
    // Hash usado quando o id não existe, para o tempo de resposta
    // não denunciar qual metade da credencial estava errada.
    dummy_hash: Arc<str>,
}

impl AuthService {
    pub fn new(
        auth_repo: AuthRepository,
        customer_repo: CustomerRepository,
        employee_repo: EmployeeRepository,
        cart_store: CartStore,
        jwt_secret: String,
        bcrypt_cost: u32,
    ) -> Result<Self, AppError> {
        let dummy_hash = hash(Uuid::new_v4().to_string(), bcrypt_cost)?;
        Ok(Self {
            auth_repo,
            customer_repo,
            employee_repo,
            cart_store,
            jwt_secret,
            bcrypt_cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    // =========================================================================
    //  VERIFICADOR DE CREDENCIAIS
    // =========================================================================

    /// Confere a senha de um cliente ou funcionário e devolve o perfil.
    /// Id inexistente e senha errada produzem exatamente o mesmo erro.
    pub async fn verify_credentials(&self, kind: PrincipalKind, id: i32, password: &str) -> Result<Profile, AppError> {
        let stored = self.auth_repo.find_hash(kind, id).await?;
        let known = stored.is_some();
        let candidate = stored.unwrap_or_else(|| self.dummy_hash.to_string());

        let password_clone = password.to_owned();
        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &candidate))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !known || !is_password_valid {
            tracing::debug!(?kind, id, "Credenciais rejeitadas");
            return Err(AppError::InvalidCredentials);
        }

        let profile = match kind {
            PrincipalKind::Customer => self.customer_repo.find_by_id(id).await?.map(Profile::Customer),
            PrincipalKind::Employee => self.employee_repo.find_by_id(id).await?.map(Profile::Employee),
        };
        profile.ok_or(AppError::InvalidCredentials)
    }

    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse, AppError> {
        let profile = self
            .verify_credentials(payload.kind, payload.number, &payload.password)
            .await?;

        let token = self.create_token(&profile)?;
        tracing::info!(kind = ?profile.kind(), id = profile.id(), "Login efetuado");

        Ok(AuthResponse {
            token,
            kind: profile.kind(),
            number: profile.id(),
            display_name: profile.display_name().to_owned(),
            role: profile.role(),
        })
    }

    /// Valida o token e confirma que a credencial ainda existe
    /// (contas excluídas e funcionários desligados perdem o acesso na hora).
    pub async fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let principal = decode_token(token, &self.jwt_secret)?;

        self.auth_repo
            .find_hash(principal.kind, principal.id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok(principal)
    }

    pub async fn change_password(&self, principal: &Principal, payload: &ChangePasswordPayload) -> Result<(), AppError> {
        self.verify_credentials(principal.kind, principal.id, &payload.old_password)
            .await?;

        let hashed = self.hash_password(&payload.new_password).await?;
        let updated = self.auth_repo.update_hash(principal.kind, principal.id, &hashed).await?;
        if updated == 0 {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(kind = ?principal.kind, id = principal.id, "Senha alterada");
        Ok(())
    }

    /// Perfil do principal autenticado (rota /me).
    pub async fn current_profile(&self, principal: &Principal) -> Result<Profile, AppError> {
        let profile = match principal.kind {
            PrincipalKind::Customer => self.customer_repo.find_by_id(principal.id).await?.map(Profile::Customer),
            PrincipalKind::Employee => self.employee_repo.find_by_id(principal.id).await?.map(Profile::Employee),
        };
        profile.ok_or(AppError::InvalidToken)
    }

    /// Encerra a sessão: o carrinho guardado no servidor é descartado.
    pub async fn logout(&self, principal: &Principal) {
        self.cart_store.clear(principal.session_id).await;
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    fn create_token(&self, profile: &Profile) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: profile.id(),
            kind: profile.kind(),
            role: profile.role(),
            sid: Uuid::new_v4(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode_token(&claims, &self.jwt_secret)
    }
}

fn encode_token(claims: &Claims, secret: &str) -> Result<String, AppError> {
    Ok(encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_ref()))?)
}

fn decode_token(token: &str, secret: &str) -> Result<Principal, AppError> {
    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map_err(|_| AppError::InvalidToken)?;
    let claims = token_data.claims;

    // Token de cliente com papel, ou de funcionário sem papel, é forjado
    if (claims.kind == PrincipalKind::Employee) != claims.role.is_some() {
        return Err(AppError::InvalidToken);
    }

    Ok(Principal {
        kind: claims.kind,
        id: claims.sub,
        role: claims.role,
        session_id: claims.sid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::EmployeeRole;

    const SECRET: &str = "test-secret";

    fn claims(kind: PrincipalKind, role: Option<EmployeeRole>, exp_offset_secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: 1370,
            kind,
            role,
            sid: Uuid::new_v4(),
            exp: (now + exp_offset_secs) as usize,
            iat: now as usize,
        }
    }

    #[test]
    fn token_round_trip_restores_principal() {
        let c = claims(PrincipalKind::Employee, Some(EmployeeRole::SalesRep), 3600);
        let sid = c.sid;
        let token = encode_token(&c, SECRET).unwrap();

        let principal = decode_token(&token, SECRET).unwrap();
        assert_eq!(principal.id, 1370);
        assert_eq!(principal.role, Some(EmployeeRole::SalesRep));
        assert_eq!(principal.session_id, sid);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = encode_token(&claims(PrincipalKind::Customer, None, 3600), "other").unwrap();
        assert!(matches!(decode_token(&token, SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = encode_token(&claims(PrincipalKind::Customer, None, -3600), SECRET).unwrap();
        assert!(matches!(decode_token(&token, SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn customer_token_carrying_a_role_is_rejected() {
        let forged = claims(PrincipalKind::Customer, Some(EmployeeRole::President), 3600);
        let token = encode_token(&forged, SECRET).unwrap();
        assert!(matches!(decode_token(&token, SECRET), Err(AppError::InvalidToken)));
    }
}
