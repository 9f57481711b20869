// src/models/invoices.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::error::AppError;
use crate::models::orders::{amount_too_large, line_total, money_total, validate_money};
use crate::models::status::{BadgeTone, StatusBadge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending, // Em aberto
    Paid,    // Quitada
    Overdue, // Vencida
}

impl StatusBadge for InvoiceStatus {
    fn badge(&self) -> BadgeTone {
        match self {
            InvoiceStatus::Pending => BadgeTone::Warning,
            InvoiceStatus::Paid => BadgeTone::Success,
            InvoiceStatus::Overdue => BadgeTone::Danger,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
        }
    }
}

impl InvoiceStatus {
    /// Regra de pagamento: só faturas em aberto ou vencidas podem ser quitadas.
    pub fn mark_paid(self) -> Result<InvoiceStatus, AppError> {
        match self {
            InvoiceStatus::Pending | InvoiceStatus::Overdue => Ok(InvoiceStatus::Paid),
            InvoiceStatus::Paid => Err(AppError::invalid_transition(self, InvoiceStatus::Paid)),
        }
    }

    pub fn mark_overdue(self) -> Result<InvoiceStatus, AppError> {
        match self {
            InvoiceStatus::Pending => Ok(InvoiceStatus::Overdue),
            other => Err(AppError::invalid_transition(other, InvoiceStatus::Overdue)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub order_id: Option<Uuid>,
    #[schema(example = 5012)]
    pub invoice_number: i64,
    #[schema(example = "1260.00")]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date, example = "2025-04-30")]
    pub due_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date, example = "2025-04-21")]
    pub paid_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceItemPayload {
    #[validate(length(min = 1, message = "required"))]
    pub description: String,
    #[validate(range(min = 1, message = "quantity_positive"))]
    pub quantity: i32,
    #[validate(custom(function = "validate_money"))]
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub brand_id: Uuid,
    pub order_id: Option<Uuid>,
    // Ignorado quando há itens: o valor passa a ser a soma deles
    #[validate(custom(function = "validate_money"))]
    #[serde(default)]
    pub amount: Decimal,
    #[schema(value_type = String, format = Date, example = "2025-04-30")]
    pub due_date: NaiveDate,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<CreateInvoiceItemPayload>,
}

impl CreateInvoicePayload {
    /// Total de cada item e valor da fatura. Sem itens, vale `amount`.
    pub fn priced_items(&self) -> Result<(Vec<Decimal>, Decimal), AppError> {
        if self.items.is_empty() {
            return Ok((Vec::new(), self.amount));
        }
        let totals = self
            .items
            .iter()
            .map(|i| line_total(i.quantity, i.unit_price))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| amount_too_large("items"))?;
        let total = money_total(totals.iter().copied()).ok_or_else(|| amount_too_large("items"))?;
        Ok((totals, total))
    }
}

/// O pedido vinculado tem de existir e ser da mesma marca da fatura.
pub fn ensure_order_belongs_to_brand(order_brand: Option<Uuid>, brand_id: Uuid) -> Result<(), AppError> {
    match order_brand {
        None => Err(AppError::ResourceNotFound("order".to_string())),
        Some(owner) if owner != brand_id => {
            let mut err = ValidationError::new("order_brand");
            err.message = Some("order_other_brand".into());
            let mut errors = ValidationErrors::new();
            errors.add("orderId", err);
            Err(AppError::ValidationError(errors))
        }
        Some(_) => Ok(()),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidPayload {
    #[schema(value_type = Option<String>, format = Date)]
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceListQuery {
    pub brand_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn only_open_invoices_can_be_paid() {
        assert_eq!(InvoiceStatus::Pending.mark_paid().unwrap(), InvoiceStatus::Paid);
        assert_eq!(InvoiceStatus::Overdue.mark_paid().unwrap(), InvoiceStatus::Paid);
        assert!(InvoiceStatus::Paid.mark_paid().is_err());
    }

    #[test]
    fn only_pending_invoices_become_overdue() {
        assert_eq!(InvoiceStatus::Pending.mark_overdue().unwrap(), InvoiceStatus::Overdue);
        assert!(InvoiceStatus::Paid.mark_overdue().is_err());
        assert!(InvoiceStatus::Overdue.mark_overdue().is_err());
    }

    #[test]
    fn items_override_the_flat_amount() {
        let payload = CreateInvoicePayload {
            brand_id: Uuid::new_v4(),
            order_id: None,
            amount: Decimal::from(999),
            due_date: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            items: vec![
                CreateInvoiceItemPayload {
                    description: "Gin 70cl x6".into(),
                    quantity: 2,
                    unit_price: Decimal::from_str("105.00").unwrap(),
                },
                CreateInvoiceItemPayload {
                    description: "Delivery".into(),
                    quantity: 1,
                    unit_price: Decimal::from_str("25.50").unwrap(),
                },
            ],
        };
        let (totals, total) = payload.priced_items().unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(total, Decimal::from_str("235.50").unwrap());
    }

    #[test]
    fn oversized_items_are_a_validation_error() {
        let payload = CreateInvoicePayload {
            brand_id: Uuid::new_v4(),
            order_id: None,
            amount: Decimal::ZERO,
            due_date: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            items: vec![CreateInvoiceItemPayload {
                description: "Gin 70cl x6".into(),
                quantity: 1000,
                unit_price: Decimal::from_str("9999999999.99").unwrap(),
            }],
        };
        assert!(payload.validate().is_ok());
        assert!(matches!(payload.priced_items(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn flat_amount_above_the_column_fails_validation() {
        let payload = CreateInvoicePayload {
            brand_id: Uuid::new_v4(),
            order_id: None,
            amount: Decimal::from_str("70000000000000000000000000000").unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            items: Vec::new(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount"));
    }

    #[test]
    fn linked_order_must_belong_to_the_invoiced_brand() {
        let brand = Uuid::new_v4();
        assert!(ensure_order_belongs_to_brand(Some(brand), brand).is_ok());
        assert!(matches!(
            ensure_order_belongs_to_brand(Some(Uuid::new_v4()), brand),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            ensure_order_belongs_to_brand(None, brand),
            Err(AppError::ResourceNotFound(_))
        ));
    }
}
