// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::error::AppError;
use crate::models::status::{Badge, BadgeTone, StatusBadge};

// --- Enums ---

/// Ciclo de vida do pedido (lado da distribuidora).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Approved,
    Dispatched,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// pending -> approved -> dispatched -> delivered; cancelled de qualquer estado aberto.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::Pending, OrderStatus::Approved) => true,
            (OrderStatus::Approved, OrderStatus::Dispatched) => true,
            (OrderStatus::Dispatched, OrderStatus::Delivered) => true,
            (from, OrderStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl StatusBadge for OrderStatus {
    fn badge(&self) -> BadgeTone {
        match self {
            OrderStatus::Pending => BadgeTone::Warning,
            OrderStatus::Approved => BadgeTone::Info,
            OrderStatus::Dispatched => BadgeTone::Info,
            OrderStatus::Delivered => BadgeTone::Success,
            OrderStatus::Cancelled => BadgeTone::Danger,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Approved => "Approved",
            OrderStatus::Dispatched => "Dispatched",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

/// Resposta da marca ao pedido, independente do ciclo de vida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "acceptance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceStatus {
    PendingReview,
    Accepted,
    Rejected,
    Query,
}

impl StatusBadge for AcceptanceStatus {
    fn badge(&self) -> BadgeTone {
        match self {
            AcceptanceStatus::PendingReview => BadgeTone::Warning,
            AcceptanceStatus::Accepted => BadgeTone::Success,
            AcceptanceStatus::Rejected => BadgeTone::Danger,
            AcceptanceStatus::Query => BadgeTone::Info,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AcceptanceStatus::PendingReview => "Awaiting your response",
            AcceptanceStatus::Accepted => "Accepted",
            AcceptanceStatus::Rejected => "Rejected",
            AcceptanceStatus::Query => "Query raised",
        }
    }
}

/// Lista fixa de motivos de rejeição.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rejection_reason", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    OutOfStock,
    PricingIssue,
    DeliveryTimeline,
    MinimumOrderNotMet,
    DiscontinuedProduct,
    Other,
}

// --- Structs do banco ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub brand_id: Uuid,
    #[schema(example = 1024)]
    pub po_number: i64,
    pub status: OrderStatus,
    pub acceptance_status: AcceptanceStatus,
    pub acceptance_comment: Option<String>,
    pub rejection_reason: Option<RejectionReason>,
    pub responded_at: Option<DateTime<Utc>>,
    #[schema(example = "1260.00")]
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    #[schema(example = "GIN-70CL")]
    pub sku: String,
    pub description: Option<String>,
    #[schema(example = 12)]
    pub quantity_cases: i32,
    #[schema(example = "105.00")]
    pub case_price: Decimal,
    #[schema(example = "1260.00")]
    pub line_total: Decimal,
}

/// Teto das colunas NUMERIC(12, 2).
pub fn max_money() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Total da linha: caixas x preço da caixa. `None` se passar do teto.
pub fn line_total(quantity_cases: i32, case_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity_cases)
        .checked_mul(case_price)
        .filter(|total| *total <= max_money())
}

/// Soma sem estouro e dentro do teto.
pub fn money_total(parts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    parts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, part| acc.checked_add(part))
        .filter(|total| *total <= max_money())
}

/// Erro de validação para valores que não cabem na coluna.
pub fn amount_too_large(field: &'static str) -> AppError {
    AppError::ValidationError(single_error(field, "range", "amount_too_large"))
}

// Resumo somente-leitura depois que a marca respondeu
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub status: AcceptanceStatus,
    pub badge: Badge,
    pub reason: Option<RejectionReason>,
    pub comment: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl ResponseSummary {
    /// `None` enquanto o pedido ainda aguarda resposta.
    pub fn of(order: &PurchaseOrder) -> Option<Self> {
        if order.acceptance_status == AcceptanceStatus::PendingReview {
            return None;
        }
        Some(Self {
            status: order.acceptance_status,
            badge: Badge::of(&order.acceptance_status),
            reason: order.rejection_reason,
            comment: order.acceptance_comment.clone(),
            responded_at: order.responded_at,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: PurchaseOrder,
    pub brand_name: String,
    pub status_badge: Badge,
    pub lines: Vec<OrderLine>,
    // Ações disponíveis só enquanto pending_review
    pub can_respond: bool,
    pub response: Option<ResponseSummary>,
}

// --- Payloads ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderLinePayload {
    #[validate(length(min = 1, message = "required"))]
    pub sku: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "quantity_positive"))]
    pub quantity_cases: i32,
    #[validate(custom(function = "validate_money"))]
    pub case_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub brand_id: Uuid,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "order_needs_lines"), nested)]
    pub lines: Vec<CreateOrderLinePayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusPayload {
    pub status: OrderStatus,
}

impl CreateOrderPayload {
    /// Total de cada linha (na ordem do payload) e do pedido.
    pub fn priced_lines(&self) -> Result<(Vec<Decimal>, Decimal), AppError> {
        let totals = self
            .lines
            .iter()
            .map(|l| line_total(l.quantity_cases, l.case_price))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| amount_too_large("lines"))?;
        let total = money_total(totals.iter().copied()).ok_or_else(|| amount_too_large("lines"))?;
        Ok((totals, total))
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub brand_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseAction {
    Accept,
    Reject,
    Query,
}

/// O que o widget de aceite envia. Os campos opcionais dependem da ação.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponsePayload {
    pub action: ResponseAction,
    pub reason: Option<RejectionReason>,
    pub comment: Option<String>,
    #[schema(example = json!("Can we split delivery across two weeks?"))]
    pub text: Option<String>,
}

/// Ação de aceite já validada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptanceAction {
    Accept { comment: Option<String> },
    Reject { reason: RejectionReason, comment: Option<String> },
    Query { text: String },
}

impl AcceptanceAction {
    pub fn resulting_status(&self) -> AcceptanceStatus {
        match self {
            AcceptanceAction::Accept { .. } => AcceptanceStatus::Accepted,
            AcceptanceAction::Reject { .. } => AcceptanceStatus::Rejected,
            AcceptanceAction::Query { .. } => AcceptanceStatus::Query,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            AcceptanceAction::Accept { comment } | AcceptanceAction::Reject { comment, .. } => {
                comment.as_deref()
            }
            AcceptanceAction::Query { text } => Some(text.as_str()),
        }
    }

    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            AcceptanceAction::Reject { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl OrderResponsePayload {
    /// Valida antes de qualquer acesso ao banco.
    pub fn into_action(self) -> Result<AcceptanceAction, ValidationErrors> {
        let comment = self.comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());

        match self.action {
            ResponseAction::Accept => Ok(AcceptanceAction::Accept { comment }),
            ResponseAction::Reject => match self.reason {
                Some(reason) => Ok(AcceptanceAction::Reject { reason, comment }),
                None => Err(single_error("reason", "required", "select_reason")),
            },
            ResponseAction::Query => {
                let text = self.text.map(|t| t.trim().to_string()).unwrap_or_default();
                if text.is_empty() {
                    Err(single_error("text", "required", "query_required"))
                } else {
                    Ok(AcceptanceAction::Query { text })
                }
            }
        }
    }
}

/// O aceite é terminal: só sai de pending_review uma vez.
pub fn ensure_awaiting_response(status: AcceptanceStatus) -> Result<(), AppError> {
    if status == AcceptanceStatus::PendingReview {
        Ok(())
    } else {
        Err(AppError::OrderAlreadyResponded)
    }
}

// ---
// Validações auxiliares
// ---
/// Valor monetário: não negativo e dentro de NUMERIC(12, 2).
pub fn validate_money(val: &Decimal) -> Result<(), ValidationError> {
    let message = if val.is_sign_negative() {
        "not_negative"
    } else if *val > max_money() {
        "amount_too_large"
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("range");
    err.message = Some(message.into());
    Err(err)
}

fn single_error(field: &'static str, code: &'static str, message: &'static str) -> ValidationErrors {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payload(action: ResponseAction) -> OrderResponsePayload {
        OrderResponsePayload { action, reason: None, comment: None, text: None }
    }

    fn message_of(errors: &ValidationErrors, field: &str) -> String {
        let fields = errors.field_errors();
        fields.get(field).unwrap()[0].message.as_deref().unwrap().to_string()
    }

    #[test]
    fn reject_without_reason_is_refused() {
        let errors = payload(ResponseAction::Reject).into_action().unwrap_err();
        assert_eq!(message_of(&errors, "reason"), "select_reason");
    }

    #[test]
    fn reject_with_reason_keeps_the_comment() {
        let mut p = payload(ResponseAction::Reject);
        p.reason = Some(RejectionReason::OutOfStock);
        p.comment = Some("  back in March ".into());
        let action = p.into_action().unwrap();
        assert_eq!(action.resulting_status(), AcceptanceStatus::Rejected);
        assert_eq!(action.reason(), Some(RejectionReason::OutOfStock));
        assert_eq!(action.comment(), Some("back in March"));
    }

    #[test]
    fn query_requires_non_blank_text() {
        let mut p = payload(ResponseAction::Query);
        p.text = Some("   ".into());
        let errors = p.into_action().unwrap_err();
        assert_eq!(message_of(&errors, "text"), "query_required");
    }

    #[test]
    fn accept_needs_nothing_else() {
        let action = payload(ResponseAction::Accept).into_action().unwrap();
        assert_eq!(action, AcceptanceAction::Accept { comment: None });
    }

    #[test]
    fn acceptance_is_terminal_once_answered() {
        assert!(ensure_awaiting_response(AcceptanceStatus::PendingReview).is_ok());
        for status in [AcceptanceStatus::Accepted, AcceptanceStatus::Rejected, AcceptanceStatus::Query] {
            assert!(matches!(
                ensure_awaiting_response(status),
                Err(AppError::OrderAlreadyResponded)
            ));
        }
    }

    #[test]
    fn lifecycle_only_moves_forward() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Approved));
        assert!(OrderStatus::Approved.can_transition_to(OrderStatus::Dispatched));
        assert!(OrderStatus::Dispatched.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Dispatched.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn line_total_is_cases_times_case_price() {
        let price = Decimal::from_str("105.50").unwrap();
        assert_eq!(line_total(12, price), Some(Decimal::from_str("1266.00").unwrap()));
    }

    #[test]
    fn huge_prices_fail_validation_instead_of_overflowing() {
        let line = CreateOrderLinePayload {
            sku: "GIN-70CL".into(),
            description: None,
            quantity_cases: 1000,
            case_price: Decimal::from_str("70000000000000000000000000000").unwrap(),
        };
        let errors = line.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["case_price"][0].message.as_deref(), Some("amount_too_large"));

        assert_eq!(line_total(1000, line.case_price), None);
        assert_eq!(line_total(2, Decimal::MAX), None);
    }

    #[test]
    fn order_total_beyond_the_column_is_a_validation_error() {
        let line = |quantity_cases| CreateOrderLinePayload {
            sku: "GIN-70CL".into(),
            description: None,
            quantity_cases,
            case_price: max_money(),
        };
        let payload = CreateOrderPayload { brand_id: Uuid::new_v4(), notes: None, lines: vec![line(1)] };
        let (totals, total) = payload.priced_lines().unwrap();
        assert_eq!(totals, vec![max_money()]);
        assert_eq!(total, max_money());

        let payload = CreateOrderPayload { brand_id: Uuid::new_v4(), notes: None, lines: vec![line(1), line(1)] };
        assert!(matches!(payload.priced_lines(), Err(AppError::ValidationError(_))));

        let payload = CreateOrderPayload { brand_id: Uuid::new_v4(), notes: None, lines: vec![line(i32::MAX)] };
        assert!(matches!(payload.priced_lines(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn negative_prices_are_still_refused() {
        let err = validate_money(&Decimal::from(-1)).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("not_negative"));
        assert!(validate_money(&max_money()).is_ok());
    }

    #[test]
    fn summary_only_exists_after_response() {
        let mut order = PurchaseOrder {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            po_number: 1000,
            status: OrderStatus::Pending,
            acceptance_status: AcceptanceStatus::PendingReview,
            acceptance_comment: None,
            rejection_reason: None,
            responded_at: None,
            total_amount: Decimal::ZERO,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(ResponseSummary::of(&order).is_none());

        order.acceptance_status = AcceptanceStatus::Accepted;
        let summary = ResponseSummary::of(&order).unwrap();
        assert_eq!(summary.badge.tone, BadgeTone::Success);
    }
}
