// src/models/promotions.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::error::AppError;
use crate::models::orders::validate_money;
use crate::models::status::{BadgeTone, StatusBadge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "promotion_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PromotionStatus {
    Pending,
    Approved,
    Rejected,
}

impl StatusBadge for PromotionStatus {
    fn badge(&self) -> BadgeTone {
        match self {
            PromotionStatus::Pending => BadgeTone::Warning,
            PromotionStatus::Approved => BadgeTone::Success,
            PromotionStatus::Rejected => BadgeTone::Danger,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PromotionStatus::Pending => "Awaiting review",
            PromotionStatus::Approved => "Approved",
            PromotionStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    /// Revisão só acontece uma vez, a partir de `pending`.
    pub fn apply(&self, from: PromotionStatus) -> Result<PromotionStatus, AppError> {
        let to = match self {
            ReviewDecision::Approved => PromotionStatus::Approved,
            ReviewDecision::Rejected => PromotionStatus::Rejected,
        };
        if from != PromotionStatus::Pending {
            return Err(AppError::invalid_transition(from, to));
        }
        Ok(to)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: Uuid,
    pub brand_id: Uuid,
    #[schema(example = "Summer spritz bundle")]
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    pub budget: Option<Decimal>,
    pub status: PromotionStatus,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_range"))]
pub struct CreatePromotionPayload {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, format = Date, example = "2025-06-01")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2025-08-31")]
    pub end_date: NaiveDate,
    #[validate(custom(function = "validate_money"))]
    pub budget: Option<Decimal>,
}

fn validate_date_range(payload: &CreatePromotionPayload) -> Result<(), ValidationError> {
    if payload.end_date < payload.start_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("date_range".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewPromotionPayload {
    pub decision: ReviewDecision,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PromotionListQuery {
    pub status: Option<PromotionStatus>,
}

// Pedido de rascunho de texto para o assistente
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftCopyPayload {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "independent bars in Scotland")]
    pub audience: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DraftCopyResponse {
    pub copy: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(start: (i32, u32, u32), end: (i32, u32, u32)) -> CreatePromotionPayload {
        CreatePromotionPayload {
            title: "Summer".into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            budget: None,
        }
    }

    #[test]
    fn end_before_start_is_invalid() {
        assert!(payload((2025, 6, 1), (2025, 5, 1)).validate().is_err());
        assert!(payload((2025, 6, 1), (2025, 6, 1)).validate().is_ok());
    }

    #[test]
    fn review_happens_once() {
        assert_eq!(
            ReviewDecision::Approved.apply(PromotionStatus::Pending).unwrap(),
            PromotionStatus::Approved
        );
        assert!(ReviewDecision::Rejected.apply(PromotionStatus::Approved).is_err());
    }
}
