// src/services/office_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::OfficeRepository,
    models::{
        auth::Principal,
        office::{CreateOfficePayload, Office, UpdateOfficePayload},
    },
};

fn ensure_president(principal: &Principal) -> Result<(), AppError> {
    if !principal.is_president() {
        return Err(AppError::Forbidden("Apenas o Presidente gerencia escritórios.".into()));
    }
    Ok(())
}

fn office_not_found(office_code: &str) -> AppError {
    AppError::NotFound(format!("Escritório '{office_code}' não encontrado."))
}

#[derive(Clone)]
pub struct OfficeService {
    office_repo: OfficeRepository,
    pool: PgPool,
}

impl OfficeService {
    pub fn new(office_repo: OfficeRepository, pool: PgPool) -> Self {
        Self { office_repo, pool }
    }

    pub async fn list_offices(&self) -> Result<Vec<Office>, AppError> {
        self.office_repo.list().await
    }

    pub async fn get_office(&self, office_code: &str) -> Result<Office, AppError> {
        self.office_repo
            .find(office_code)
            .await?
            .ok_or_else(|| office_not_found(office_code))
    }

    pub async fn create_office(&self, principal: &Principal, payload: &CreateOfficePayload) -> Result<Office, AppError> {
        ensure_president(principal)?;
        let office = self.office_repo.insert(payload).await?;
        tracing::info!(office_code = %office.office_code, "Escritório criado");
        Ok(office)
    }

    pub async fn update_office(
        &self,
        principal: &Principal,
        office_code: &str,
        payload: &UpdateOfficePayload,
    ) -> Result<Office, AppError> {
        ensure_president(principal)?;
        self.office_repo
            .update(office_code, payload)
            .await?
            .ok_or_else(|| office_not_found(office_code))
    }

    /// Escritório com funcionários não pode ser excluído. A contagem e a
    /// exclusão acontecem com a linha do escritório travada.
    pub async fn delete_office(&self, principal: &Principal, office_code: &str) -> Result<(), AppError> {
        ensure_president(principal)?;

        let mut tx = self.pool.begin().await?;

        let employees = self
            .office_repo
            .lock_and_count_employees(&mut *tx, office_code)
            .await?
            .ok_or_else(|| office_not_found(office_code))?;
        if employees > 0 {
            return Err(AppError::IntegrityViolation(format!(
                "O escritório '{office_code}' ainda tem {employees} funcionário(s)."
            )));
        }

        self.office_repo.delete(&mut *tx, office_code).await?;
        tx.commit().await?;

        tracing::info!(office_code, "Escritório excluído");
        Ok(())
    }
}
