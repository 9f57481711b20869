// src/services/brand_service.rs

use std::sync::Arc;

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{brand_repo::BrandField, BrandRepository},
    models::brand::{
        application_is_editable, AwrsCheckResult, Brand, BrandStatus, BrandTransition,
        UpdateApplicationPayload,
    },
    services::awrs::AwrsVerifier,
};

#[derive(Clone)]
pub struct BrandService {
    brand_repo: BrandRepository,
    awrs_verifier: Arc<dyn AwrsVerifier>,
}

impl BrandService {
    pub fn new(brand_repo: BrandRepository, awrs_verifier: Arc<dyn AwrsVerifier>) -> Self {
        Self { brand_repo, awrs_verifier }
    }

    pub async fn get(&self, conn: &mut PgConnection, brand_id: Uuid) -> Result<Brand, AppError> {
        self.brand_repo
            .find_by_id(&mut *conn, brand_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("brand".to_string()))
    }

    pub async fn list(
        &self,
        conn: &mut PgConnection,
        status: Option<BrandStatus>,
    ) -> Result<Vec<Brand>, AppError> {
        self.brand_repo.list(&mut *conn, status).await
    }

    /// Edição da ficha: só em `draft` ou `rejected`.
    pub async fn update_application(
        &self,
        conn: &mut PgConnection,
        brand_id: Uuid,
        payload: &UpdateApplicationPayload,
    ) -> Result<Brand, AppError> {
        let brand = self.get(&mut *conn, brand_id).await?;
        if !application_is_editable(brand.status) {
            return Err(AppError::invalid_transition(brand.status, "ApplicationEdit"));
        }

        self.brand_repo
            .update_application(&mut *conn, brand_id, payload)
            .await?
            .ok_or_else(|| AppError::invalid_transition(brand.status, "ApplicationEdit"))
    }

    /// Aplica uma ação do onboarding, gravando o texto que a acompanha.
    pub async fn transition(
        &self,
        conn: &mut PgConnection,
        brand_id: Uuid,
        action: BrandTransition,
        detail: Option<(BrandField, &str)>,
    ) -> Result<Brand, AppError> {
        let brand = self.get(&mut *conn, brand_id).await?;
        let next = action.apply(brand.status)?;

        let updated = self
            .brand_repo
            .update_status(&mut *conn, brand_id, brand.status, next, detail)
            .await?
            // Outra requisição mudou o status entre a leitura e a escrita
            .ok_or_else(|| AppError::invalid_transition(brand.status, action))?;

        tracing::info!("Marca {}: {:?} -> {:?}", brand_id, brand.status, updated.status);
        Ok(updated)
    }

    /// Confere o formato do AWRS; quando válido, guarda o número normalizado.
    pub async fn check_awrs(
        &self,
        conn: &mut PgConnection,
        brand_id: Uuid,
        awrs_number: &str,
    ) -> Result<AwrsCheckResult, AppError> {
        let result = self.awrs_verifier.verify(awrs_number).await?;

        if result.format_valid {
            self.brand_repo
                .set_awrs_number(&mut *conn, brand_id, &result.normalized)
                .await?;
        }

        Ok(result)
    }
}
