// src/db/promotion_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::promotions::{CreatePromotionPayload, Promotion, PromotionStatus},
};

const PROMOTION_COLUMNS: &str = r#"
    id, brand_id, title, description, start_date, end_date, budget,
    status, review_note, created_at
"#;

#[derive(Clone, Default)]
pub struct PromotionRepository;

impl PromotionRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        brand_id: Uuid,
        payload: &CreatePromotionPayload,
    ) -> Result<Promotion, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let promotion = sqlx::query_as::<_, Promotion>(&format!(
            r#"
            INSERT INTO promotions (brand_id, title, description, start_date, end_date, budget)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PROMOTION_COLUMNS
        ))
        .bind(brand_id)
        .bind(payload.title.trim())
        .bind(&payload.description)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.budget)
        .fetch_one(executor)
        .await?;
        Ok(promotion)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        brand_id: Option<Uuid>,
        status: Option<PromotionStatus>,
    ) -> Result<Vec<Promotion>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let promotions = sqlx::query_as::<_, Promotion>(&format!(
            r#"
            SELECT {} FROM promotions
            WHERE ($1::uuid IS NULL OR brand_id = $1)
              AND ($2::promotion_status IS NULL OR status = $2)
            ORDER BY start_date DESC
            "#,
            PROMOTION_COLUMNS
        ))
        .bind(brand_id)
        .bind(status)
        .fetch_all(executor)
        .await?;
        Ok(promotions)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Promotion>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let promotion = sqlx::query_as::<_, Promotion>(&format!(
            "SELECT {} FROM promotions WHERE id = $1",
            PROMOTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(promotion)
    }

    pub async fn review<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        to: PromotionStatus,
        note: Option<&str>,
    ) -> Result<Option<Promotion>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let promotion = sqlx::query_as::<_, Promotion>(&format!(
            "UPDATE promotions SET status = $2, review_note = $3 \
             WHERE id = $1 AND status = 'pending' RETURNING {}",
            PROMOTION_COLUMNS
        ))
        .bind(id)
        .bind(to)
        .bind(note)
        .fetch_optional(executor)
        .await?;
        Ok(promotion)
    }
}
