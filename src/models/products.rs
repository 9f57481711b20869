// src/models/products.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::orders::validate_money;

// Catálogo da marca (preço por caixa)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub brand_id: Uuid,
    #[schema(example = "GIN-70CL")]
    pub sku: String,
    #[schema(example = "London Dry Gin 70cl")]
    pub name: String,
    #[schema(example = 6)]
    pub case_size: i32,
    #[schema(example = "105.00")]
    pub case_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "required"))]
    pub sku: String,
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[validate(range(min = 1, message = "quantity_positive"))]
    pub case_size: i32,
    #[validate(custom(function = "validate_money"))]
    pub case_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cases_and_negative_prices_are_invalid() {
        let payload = CreateProductPayload {
            sku: "GIN-70CL".into(),
            name: "Gin".into(),
            case_size: 0,
            case_price: Decimal::NEGATIVE_ONE,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("case_size"));
        assert!(fields.contains_key("case_price"));
    }
}
