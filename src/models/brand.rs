// src/models/brand.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::status::{Badge, BadgeTone, StatusBadge};

// ---
// 1. Status de onboarding/aprovação da marca
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "brand_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BrandStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    PricingReview,
    PricingAccepted,
    ContractPending,
    ContractSigned,
    ShippingSetup,
    Active,
}

impl StatusBadge for BrandStatus {
    fn badge(&self) -> BadgeTone {
        match self {
            BrandStatus::Draft => BadgeTone::Neutral,
            BrandStatus::Pending => BadgeTone::Warning,
            BrandStatus::Approved
            | BrandStatus::PricingReview
            | BrandStatus::PricingAccepted
            | BrandStatus::ContractPending
            | BrandStatus::ContractSigned
            | BrandStatus::ShippingSetup => BadgeTone::Info,
            BrandStatus::Rejected => BadgeTone::Danger,
            BrandStatus::Active => BadgeTone::Success,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BrandStatus::Draft => "Draft",
            BrandStatus::Pending => "Pending approval",
            BrandStatus::Approved => "Approved",
            BrandStatus::Rejected => "Rejected",
            BrandStatus::PricingReview => "Pricing review",
            BrandStatus::PricingAccepted => "Pricing accepted",
            BrandStatus::ContractPending => "Contract pending",
            BrandStatus::ContractSigned => "Contract signed",
            BrandStatus::ShippingSetup => "Shipping setup",
            BrandStatus::Active => "Active",
        }
    }
}

// ---
// 2. Roteador de onboarding (tabela fixa status -> página)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingRoute {
    Start,
    Pending,
    Pricing,
    Contracts,
    Shipping,
    Dashboard,
}

impl OnboardingRoute {
    /// Marca sem status (ou sem marca) começa do início.
    pub fn for_status(status: Option<BrandStatus>) -> Self {
        match status {
            None | Some(BrandStatus::Draft) => OnboardingRoute::Start,
            Some(BrandStatus::Pending) | Some(BrandStatus::Rejected) => OnboardingRoute::Pending,
            Some(BrandStatus::Approved) | Some(BrandStatus::PricingReview) => {
                OnboardingRoute::Pricing
            }
            Some(BrandStatus::PricingAccepted) | Some(BrandStatus::ContractPending) => {
                OnboardingRoute::Contracts
            }
            Some(BrandStatus::ContractSigned) | Some(BrandStatus::ShippingSetup) => {
                OnboardingRoute::Shipping
            }
            Some(BrandStatus::Active) => OnboardingRoute::Dashboard,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            OnboardingRoute::Start => "/onboarding",
            OnboardingRoute::Pending => "/onboarding/pending",
            OnboardingRoute::Pricing => "/onboarding/pricing",
            OnboardingRoute::Contracts => "/onboarding/contracts",
            OnboardingRoute::Shipping => "/onboarding/shipping",
            OnboardingRoute::Dashboard => "/dashboard",
        }
    }

    /// Segmento de /onboarding/{step}
    pub fn from_step(step: &str) -> Option<Self> {
        match step {
            "pending" => Some(OnboardingRoute::Pending),
            "pricing" => Some(OnboardingRoute::Pricing),
            "contracts" => Some(OnboardingRoute::Contracts),
            "shipping" => Some(OnboardingRoute::Shipping),
            _ => None,
        }
    }
}

// ---
// 3. Ações que movem o status da marca
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandTransition {
    Submit,
    Approve,
    Reject,
    ProposePricing,
    AcceptPricing,
    SendContract,
    SignContract,
    SetupShipping,
    Activate,
}

impl BrandTransition {
    /// Status resultante, ou erro se a ação não vale no status atual.
    pub fn apply(&self, from: BrandStatus) -> Result<BrandStatus, AppError> {
        use BrandStatus::*;

        let to = match (self, from) {
            (BrandTransition::Submit, Draft | Rejected) => Pending,
            (BrandTransition::Approve, Pending) => Approved,
            (BrandTransition::Reject, Pending) => Rejected,
            (BrandTransition::ProposePricing, Approved | PricingReview) => PricingReview,
            (BrandTransition::AcceptPricing, PricingReview) => PricingAccepted,
            (BrandTransition::SendContract, PricingAccepted) => ContractPending,
            (BrandTransition::SignContract, ContractPending) => ContractSigned,
            (BrandTransition::SetupShipping, ContractSigned | ShippingSetup) => ShippingSetup,
            (BrandTransition::Activate, ShippingSetup) => Active,
            (action, from) => return Err(AppError::invalid_transition(from, action)),
        };

        Ok(to)
    }
}

/// A ficha de cadastro só é editável antes do envio (ou após rejeição).
pub fn application_is_editable(status: BrandStatus) -> bool {
    matches!(status, BrandStatus::Draft | BrandStatus::Rejected)
}

// ---
// 4. Structs do banco
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: Uuid,
    #[schema(example = "Example Gin Co. Ltd")]
    pub legal_name: String,
    #[schema(example = "Example Gin")]
    pub trading_name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[schema(example = "spirits")]
    pub category: Option<String>,
    #[schema(example = "XQAW00000123456")]
    pub awrs_number: Option<String>,
    pub status: BrandStatus,
    pub rejection_reason: Option<String>,
    pub pricing_terms: Option<String>,
    pub contract_reference: Option<String>,
    pub contract_signed_by: Option<String>,
    pub shipping_notes: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Marca + onde ela deve estar no onboarding
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandView {
    #[serde(flatten)]
    pub brand: Brand,
    pub badge: Badge,
    #[schema(example = "/onboarding/pricing")]
    pub onboarding_path: &'static str,
}

impl From<Brand> for BrandView {
    fn from(brand: Brand) -> Self {
        let badge = Badge::of(&brand.status);
        let onboarding_path = OnboardingRoute::for_status(Some(brand.status)).path();
        Self { brand, badge, onboarding_path }
    }
}

// ---
// 5. Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationPayload {
    #[validate(length(min = 1, message = "required"))]
    pub legal_name: String,
    pub trading_name: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectBrandPayload {
    #[validate(length(min = 1, message = "required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PricingTermsPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "30% distributor margin, 60-day payment terms")]
    pub terms: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContractPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "DIST-2025-014")]
    pub reference: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignContractPayload {
    #[validate(length(min = 1, message = "required"))]
    pub signed_by: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ShippingPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Palletised, collection from Leith bonded warehouse")]
    pub notes: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwrsCheckPayload {
    #[schema(example = "XQAW00000123456")]
    pub awrs_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwrsCheckResult {
    pub normalized: String,
    pub format_valid: bool,
    // Nunca consultamos o registro do governo
    pub registry_checked: bool,
}

#[derive(Debug, Deserialize)]
pub struct BrandListQuery {
    pub status: Option<BrandStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_redirect_table_matches_documented_targets() {
        let table = [
            (Some(BrandStatus::Pending), "/onboarding/pending"),
            (Some(BrandStatus::Approved), "/onboarding/pricing"),
            (Some(BrandStatus::PricingReview), "/onboarding/pricing"),
            (Some(BrandStatus::PricingAccepted), "/onboarding/contracts"),
            (Some(BrandStatus::ContractPending), "/onboarding/contracts"),
            (Some(BrandStatus::ContractSigned), "/onboarding/shipping"),
            (Some(BrandStatus::ShippingSetup), "/onboarding/shipping"),
            (Some(BrandStatus::Active), "/dashboard"),
            (Some(BrandStatus::Rejected), "/onboarding/pending"),
            (Some(BrandStatus::Draft), "/onboarding"),
            (None, "/onboarding"),
        ];

        for (status, target) in table {
            assert_eq!(OnboardingRoute::for_status(status).path(), target, "{:?}", status);
        }
    }

    #[test]
    fn onboarding_happy_path_reaches_active() {
        let steps = [
            BrandTransition::Submit,
            BrandTransition::Approve,
            BrandTransition::ProposePricing,
            BrandTransition::AcceptPricing,
            BrandTransition::SendContract,
            BrandTransition::SignContract,
            BrandTransition::SetupShipping,
            BrandTransition::Activate,
        ];

        let status = steps
            .iter()
            .try_fold(BrandStatus::Draft, |status, step| step.apply(status))
            .unwrap();

        assert_eq!(status, BrandStatus::Active);
    }

    #[test]
    fn rejected_brand_can_resubmit_but_not_skip_ahead() {
        assert_eq!(BrandTransition::Submit.apply(BrandStatus::Rejected).unwrap(), BrandStatus::Pending);
        assert!(BrandTransition::Activate.apply(BrandStatus::Pending).is_err());
        assert!(BrandTransition::Approve.apply(BrandStatus::Active).is_err());
    }

    #[test]
    fn application_is_only_editable_before_review() {
        assert!(application_is_editable(BrandStatus::Draft));
        assert!(application_is_editable(BrandStatus::Rejected));
        assert!(!application_is_editable(BrandStatus::Pending));
        assert!(!application_is_editable(BrandStatus::Active));
    }

    #[test]
    fn steps_parse_from_path_segments() {
        assert_eq!(OnboardingRoute::from_step("pricing"), Some(OnboardingRoute::Pricing));
        assert_eq!(OnboardingRoute::from_step("nope"), None);
    }
}
