// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::brand::{BrandView, OnboardingRoute};
use crate::models::invoices::Invoice;
use crate::models::orders::PurchaseOrder;

// Contagem agrupada por status (gráficos e cards)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    #[schema(example = "pending_review")]
    pub status: String,
    pub total: i64,
}

// 1. Cards do topo da marca
#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandTotals {
    pub awaiting_response: i64,
    pub open_orders: i64,
    pub outstanding_amount: Decimal,
    pub overdue_invoices: i64,
    pub unread_messages: i64,
}

// 2. Painel da marca
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandDashboard {
    pub brand: BrandView,
    // Preenchido enquanto a marca não está ativa
    pub onboarding: Option<OnboardingRoute>,
    pub totals: BrandTotals,
    pub recent_orders: Vec<PurchaseOrder>,
    pub open_invoices: Vec<Invoice>,
}

// 3. Cards da equipe
#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminTotals {
    pub brands_awaiting_approval: i64,
    pub active_brands: i64,
    pub orders_awaiting_response: i64,
    pub outstanding_amount: Decimal,
    pub unread_messages: i64,
    pub promotions_to_review: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub totals: AdminTotals,
    pub brands_by_status: Vec<StatusCount>,
    // Ciclo de vida (pending, approved, ...)
    pub orders_by_status: Vec<StatusCount>,
    pub orders_by_acceptance: Vec<StatusCount>,
}

// Página de onboarding: a etapa atual e a ficha da marca (se houver)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingPage {
    pub step: OnboardingRoute,
    #[schema(example = "/onboarding/pricing")]
    pub path: &'static str,
    pub brand: Option<BrandView>,
}

// Páginas públicas de autenticação
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPage {
    #[schema(example = "login")]
    pub page: &'static str,
    pub error: Option<String>,
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
