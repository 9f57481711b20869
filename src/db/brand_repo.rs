// src/db/brand_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::brand::{Brand, BrandStatus, UpdateApplicationPayload},
};

const BRAND_COLUMNS: &str = r#"
    id, legal_name, trading_name, contact_name, contact_email, contact_phone,
    category, awrs_number, status, rejection_reason, pricing_terms,
    contract_reference, contract_signed_by, shipping_notes,
    submitted_at, approved_at, created_at, updated_at
"#;

/// Campo de texto gravado junto com uma transição de status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandField {
    RejectionReason,
    PricingTerms,
    ContractReference,
    ContractSignedBy,
    ShippingNotes,
}

impl BrandField {
    fn column(&self) -> &'static str {
        match self {
            BrandField::RejectionReason => "rejection_reason",
            BrandField::PricingTerms => "pricing_terms",
            BrandField::ContractReference => "contract_reference",
            BrandField::ContractSignedBy => "contract_signed_by",
            BrandField::ShippingNotes => "shipping_notes",
        }
    }
}

#[derive(Clone, Default)]
pub struct BrandRepository;

impl BrandRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_draft<'e, E>(&self, executor: E, legal_name: &str) -> Result<Brand, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let brand = sqlx::query_as::<_, Brand>(&format!(
            "INSERT INTO brands (legal_name) VALUES ($1) RETURNING {}",
            BRAND_COLUMNS
        ))
        .bind(legal_name)
        .fetch_one(executor)
        .await?;
        Ok(brand)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Brand>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let brand = sqlx::query_as::<_, Brand>(&format!("SELECT {} FROM brands WHERE id = $1", BRAND_COLUMNS))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(brand)
    }

    pub async fn list<'e, E>(&self, executor: E, status: Option<BrandStatus>) -> Result<Vec<Brand>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let brands = sqlx::query_as::<_, Brand>(&format!(
            "SELECT {} FROM brands WHERE ($1::brand_status IS NULL OR status = $1) ORDER BY created_at DESC",
            BRAND_COLUMNS
        ))
        .bind(status)
        .fetch_all(executor)
        .await?;
        Ok(brands)
    }

    pub async fn update_application<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateApplicationPayload,
    ) -> Result<Option<Brand>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Só grava enquanto a ficha ainda é editável
        let brand = sqlx::query_as::<_, Brand>(&format!(
            r#"
            UPDATE brands SET
                legal_name = $2, trading_name = $3, contact_name = $4,
                contact_email = $5, contact_phone = $6, category = $7,
                updated_at = NOW()
            WHERE id = $1 AND status IN ('draft', 'rejected')
            RETURNING {}
            "#,
            BRAND_COLUMNS
        ))
        .bind(id)
        .bind(&payload.legal_name)
        .bind(&payload.trading_name)
        .bind(&payload.contact_name)
        .bind(&payload.contact_email)
        .bind(&payload.contact_phone)
        .bind(&payload.category)
        .fetch_optional(executor)
        .await?;
        Ok(brand)
    }

    /// Move de `from` para `to`. None se o status mudou no meio do caminho.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        from: BrandStatus,
        to: BrandStatus,
        detail: Option<(BrandField, &str)>,
    ) -> Result<Option<Brand>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let detail_set = detail
            .map(|(field, _)| format!(", {} = $4", field.column()))
            .unwrap_or_default();

        let sql = format!(
            r#"
            UPDATE brands SET
                status = $3,
                submitted_at = CASE WHEN $3 = 'pending'::brand_status THEN NOW() ELSE submitted_at END,
                approved_at = CASE WHEN $3 = 'approved'::brand_status THEN NOW() ELSE approved_at END,
                updated_at = NOW(){}
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            detail_set, BRAND_COLUMNS
        );

        let mut query = sqlx::query_as::<_, Brand>(&sql).bind(id).bind(from).bind(to);
        if let Some((_, value)) = detail {
            query = query.bind(value);
        }

        let brand = query.fetch_optional(executor).await?;
        Ok(brand)
    }

    pub async fn set_awrs_number<'e, E>(&self, executor: E, id: Uuid, awrs: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE brands SET awrs_number = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(awrs)
            .execute(executor)
            .await?;
        Ok(())
    }
}
