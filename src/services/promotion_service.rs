// src/services/promotion_service.rs

use std::sync::Arc;

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BrandRepository, PromotionRepository},
    models::promotions::{
        CreatePromotionPayload, DraftCopyPayload, Promotion, PromotionStatus, ReviewPromotionPayload,
    },
    services::assistant::{build_prompt, CopyAssistant},
};

#[derive(Clone)]
pub struct PromotionService {
    promotion_repo: PromotionRepository,
    brand_repo: BrandRepository,
    copy_assistant: Arc<dyn CopyAssistant>,
}

impl PromotionService {
    pub fn new(
        promotion_repo: PromotionRepository,
        brand_repo: BrandRepository,
        copy_assistant: Arc<dyn CopyAssistant>,
    ) -> Self {
        Self { promotion_repo, brand_repo, copy_assistant }
    }

    pub async fn suggest(
        &self,
        conn: &mut PgConnection,
        brand_id: Uuid,
        payload: &CreatePromotionPayload,
    ) -> Result<Promotion, AppError> {
        let promotion = self.promotion_repo.create(&mut *conn, brand_id, payload).await?;
        tracing::info!("Promoção {} sugerida pela marca {}", promotion.id, brand_id);
        Ok(promotion)
    }

    pub async fn list(
        &self,
        conn: &mut PgConnection,
        brand_id: Option<Uuid>,
        status: Option<PromotionStatus>,
    ) -> Result<Vec<Promotion>, AppError> {
        self.promotion_repo.list(&mut *conn, brand_id, status).await
    }

    /// Aprovação/rejeição pela equipe; só uma vez.
    pub async fn review(
        &self,
        conn: &mut PgConnection,
        promotion_id: Uuid,
        payload: &ReviewPromotionPayload,
    ) -> Result<Promotion, AppError> {
        let promotion = self
            .promotion_repo
            .find_by_id(&mut *conn, promotion_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("promotion".to_string()))?;

        let next = payload.decision.apply(promotion.status)?;
        let note = payload.note.as_deref().map(str::trim).filter(|n| !n.is_empty());

        self.promotion_repo
            .review(&mut *conn, promotion_id, next, note)
            .await?
            .ok_or_else(|| AppError::invalid_transition(promotion.status, next))
    }

    /// Rascunho de texto via assistente (sem provedor real, responde 503).
    pub async fn draft_copy(
        &self,
        conn: &mut PgConnection,
        brand_id: Uuid,
        payload: &DraftCopyPayload,
    ) -> Result<String, AppError> {
        let brand = self
            .brand_repo
            .find_by_id(&mut *conn, brand_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("brand".to_string()))?;

        let brand_name = brand.trading_name.as_deref().unwrap_or(&brand.legal_name);
        let prompt = build_prompt(brand_name, payload);
        self.copy_assistant.draft(&prompt).await
    }
}
