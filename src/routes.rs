// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::handlers;
use crate::middleware::{
    access::page_guard,
    auth::{admin_guard, api_auth_guard, brand_guard},
};

// Rotas do chat, montadas para a marca e para a equipe
fn support_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/channels",
            get(handlers::support::list_channels).post(handlers::support::create_channel),
        )
        .route(
            "/channels/{id}/messages",
            get(handlers::support::list_messages).post(handlers::support::send_message),
        )
        .route("/channels/{id}/stream", get(handlers::support::stream_channel))
}

/// Monta o router completo da aplicação.
pub fn build_router(app_state: AppState) -> Router {
    // Autenticação (pública)
    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/password-reset/request", post(handlers::auth::request_password_reset))
        .route("/password-reset/confirm", post(handlers::auth::reset_password));

    // Usuário da sessão
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            api_auth_guard,
        ));

    // Portal do parceiro
    let brand_routes = Router::new()
        .route("/", get(handlers::brand::get_brand))
        .route("/application", put(handlers::brand::update_application))
        .route("/application/submit", post(handlers::brand::submit_application))
        .route("/pricing/accept", post(handlers::brand::accept_pricing))
        .route("/contract/sign", post(handlers::brand::sign_contract))
        .route("/shipping", post(handlers::brand::setup_shipping))
        .route("/awrs/check", post(handlers::brand::check_awrs))
        .route(
            "/products",
            get(handlers::brand::list_products).post(handlers::brand::create_product),
        )
        .route("/orders", get(handlers::brand::list_orders))
        .route("/orders/{id}", get(handlers::brand::get_order))
        .route("/orders/{id}/response", post(handlers::brand::respond_to_order))
        .route("/invoices", get(handlers::brand::list_invoices))
        .route("/invoices/{id}/pdf", get(handlers::brand::download_invoice_pdf))
        .route(
            "/promotions",
            get(handlers::brand::list_promotions).post(handlers::brand::suggest_promotion),
        )
        .route("/promotions/draft-copy", post(handlers::brand::draft_promotion_copy))
        .nest("/support", support_routes())
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            brand_guard,
        ));

    // Área da equipe
    let admin_routes = Router::new()
        .route("/brands", get(handlers::admin::list_brands))
        .route("/brands/{id}", get(handlers::admin::get_brand))
        .route("/brands/{id}/approve", post(handlers::admin::approve_brand))
        .route("/brands/{id}/reject", post(handlers::admin::reject_brand))
        .route("/brands/{id}/pricing", post(handlers::admin::propose_pricing))
        .route("/brands/{id}/contract", post(handlers::admin::send_contract))
        .route("/brands/{id}/activate", post(handlers::admin::activate_brand))
        .route("/users", get(handlers::admin::list_users))
        .route("/users/{id}/brand", put(handlers::admin::assign_brand))
        .route("/users/{id}/role", put(handlers::admin::set_role))
        .route(
            "/orders",
            get(handlers::admin::list_orders).post(handlers::admin::create_order),
        )
        .route("/orders/{id}", get(handlers::admin::get_order))
        .route("/orders/{id}/status", post(handlers::admin::update_order_status))
        .route(
            "/invoices",
            get(handlers::admin::list_invoices).post(handlers::admin::create_invoice),
        )
        .route("/invoices/{id}/paid", post(handlers::admin::mark_invoice_paid))
        .route("/invoices/{id}/overdue", post(handlers::admin::mark_invoice_overdue))
        .route("/promotions", get(handlers::admin::list_promotions))
        .route("/promotions/{id}/review", post(handlers::admin::review_promotion))
        .route("/data/delete", post(handlers::admin::delete_data))
        .nest("/support", support_routes())
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            admin_guard,
        ));

    // Páginas: o guarda vê o caminho completo, por isso sem nest
    let page_routes = Router::new()
        .route("/login", get(handlers::pages::login_page))
        .route("/signup", get(handlers::pages::signup_page))
        .route("/reset-password", get(handlers::pages::reset_password_page))
        .route("/dashboard", get(handlers::pages::dashboard_page))
        .route("/onboarding", get(handlers::pages::onboarding_page))
        .route("/onboarding/{step}", get(handlers::pages::onboarding_step_page))
        .route("/admin", get(handlers::pages::admin_page))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            page_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/auth/callback", get(handlers::auth::auth_callback))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/brand", brand_routes)
        .nest("/api/admin", admin_routes)
        .merge(page_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
