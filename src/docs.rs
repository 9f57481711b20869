// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::request_password_reset,
        handlers::auth::reset_password,

        // --- Users ---
        handlers::auth::get_me,

        // --- Brand ---
        handlers::brand::get_brand,
        handlers::brand::update_application,
        handlers::brand::submit_application,
        handlers::brand::accept_pricing,
        handlers::brand::sign_contract,
        handlers::brand::setup_shipping,
        handlers::brand::check_awrs,
        handlers::brand::list_products,
        handlers::brand::create_product,
        handlers::brand::list_orders,
        handlers::brand::get_order,
        handlers::brand::respond_to_order,
        handlers::brand::list_invoices,
        handlers::brand::download_invoice_pdf,
        handlers::brand::list_promotions,
        handlers::brand::suggest_promotion,
        handlers::brand::draft_promotion_copy,

        // --- Support ---
        handlers::support::list_channels,
        handlers::support::create_channel,
        handlers::support::list_messages,
        handlers::support::send_message,

        // --- Admin ---
        handlers::admin::list_brands,
        handlers::admin::get_brand,
        handlers::admin::approve_brand,
        handlers::admin::reject_brand,
        handlers::admin::propose_pricing,
        handlers::admin::send_contract,
        handlers::admin::activate_brand,
        handlers::admin::list_users,
        handlers::admin::assign_brand,
        handlers::admin::set_role,
        handlers::admin::create_order,
        handlers::admin::list_orders,
        handlers::admin::get_order,
        handlers::admin::update_order_status,
        handlers::admin::create_invoice,
        handlers::admin::list_invoices,
        handlers::admin::mark_invoice_paid,
        handlers::admin::mark_invoice_overdue,
        handlers::admin::list_promotions,
        handlers::admin::review_promotion,
        handlers::admin::delete_data,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::CurrentUser,
            models::auth::SignupPayload,
            models::auth::LoginPayload,
            models::auth::PasswordResetRequestPayload,
            models::auth::PasswordResetPayload,
            models::auth::AuthResponse,
            models::auth::AssignBrandPayload,
            models::auth::SetRolePayload,

            // --- Status ---
            models::status::BadgeTone,
            models::status::Badge,

            // --- Brand ---
            models::brand::BrandStatus,
            models::brand::OnboardingRoute,
            models::brand::Brand,
            models::brand::BrandView,
            models::brand::UpdateApplicationPayload,
            models::brand::RejectBrandPayload,
            models::brand::PricingTermsPayload,
            models::brand::ContractPayload,
            models::brand::SignContractPayload,
            models::brand::ShippingPayload,
            models::brand::AwrsCheckPayload,
            models::brand::AwrsCheckResult,

            // --- Products ---
            models::products::Product,
            models::products::CreateProductPayload,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::AcceptanceStatus,
            models::orders::RejectionReason,
            models::orders::PurchaseOrder,
            models::orders::OrderLine,
            models::orders::ResponseSummary,
            models::orders::OrderDetail,
            models::orders::CreateOrderLinePayload,
            models::orders::CreateOrderPayload,
            models::orders::UpdateOrderStatusPayload,
            models::orders::ResponseAction,
            models::orders::OrderResponsePayload,

            // --- Invoices ---
            models::invoices::InvoiceStatus,
            models::invoices::Invoice,
            models::invoices::InvoiceItem,
            models::invoices::CreateInvoiceItemPayload,
            models::invoices::CreateInvoicePayload,
            models::invoices::MarkPaidPayload,

            // --- Support ---
            models::support::ChannelType,
            models::support::SupportChannel,
            models::support::ChannelSummary,
            models::support::SupportMessage,
            models::support::CreateChannelPayload,
            models::support::SendMessagePayload,

            // --- Promotions ---
            models::promotions::PromotionStatus,
            models::promotions::ReviewDecision,
            models::promotions::Promotion,
            models::promotions::CreatePromotionPayload,
            models::promotions::ReviewPromotionPayload,
            models::promotions::DraftCopyPayload,
            models::promotions::DraftCopyResponse,

            // --- Dashboard ---
            models::dashboard::StatusCount,
            models::dashboard::BrandTotals,
            models::dashboard::BrandDashboard,
            models::dashboard::AdminTotals,
            models::dashboard::AdminDashboard,

            // --- Data ---
            models::data::DeletionScope,
            models::data::DeletionStep,
            models::data::StepReport,
            models::data::DeletionReport,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro, Login e Redefinição de Senha"),
        (name = "Users", description = "Dados do Usuário da Sessão"),
        (name = "Brand", description = "Portal do Parceiro: Onboarding, Pedidos, Faturas e Promoções"),
        (name = "Support", description = "Chat de Suporte (mesmas rotas em /api/admin/support)"),
        (name = "Admin", description = "Operação da Equipe")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
