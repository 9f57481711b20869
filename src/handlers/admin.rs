// src/handlers/admin.rs
//
// API da equipe (admin_guard). Chat e stream ficam em handlers::support.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::get_rls_transaction,
        error::{ApiError, AppError},
    },
    config::AppState,
    db::brand_repo::BrandField,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::{AssignBrandPayload, CurrentUser, SetRolePayload},
        brand::{
            Brand, BrandListQuery, BrandTransition, BrandView, ContractPayload, PricingTermsPayload,
            RejectBrandPayload,
        },
        data::{DeletionReport, DeletionScope},
        invoices::{CreateInvoicePayload, Invoice, InvoiceListQuery, MarkPaidPayload},
        orders::{CreateOrderPayload, OrderDetail, OrderListQuery, PurchaseOrder, UpdateOrderStatusPayload},
        promotions::{Promotion, PromotionListQuery, ReviewPromotionPayload},
    },
};

// =============================================================================
//  ÁREA 1: MARCAS
// =============================================================================

// GET /api/admin/brands
#[utoipa::path(
    get,
    path = "/api/admin/brands",
    tag = "Admin",
    params(("status" = Option<String>, Query, description = "Filtra pelo status de onboarding")),
    responses((status = 200, body = Vec<Brand>)),
    security(("api_jwt" = []))
)]
pub async fn list_brands(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<BrandListQuery>,
) -> Result<Json<Vec<Brand>>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let brands = app_state
        .brand_service
        .list(&mut *tx, query.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brands))
}

// GET /api/admin/brands/{id}
#[utoipa::path(
    get,
    path = "/api/admin/brands/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses((status = 200, body = BrandView), (status = 404, description = "Marca não encontrada")),
    security(("api_jwt" = []))
)]
pub async fn get_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(brand_id): Path<Uuid>,
) -> Result<Json<BrandView>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .brand_service
        .get(&mut *tx, brand_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(BrandView::from(brand)))
}

async fn transition_brand(
    app_state: &AppState,
    locale: &Locale,
    user: &AuthenticatedUser,
    brand_id: Uuid,
    action: BrandTransition,
    detail: Option<(BrandField, &str)>,
) -> Result<Json<BrandView>, ApiError> {
    let mut tx = get_rls_transaction(app_state, user)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    let brand = app_state
        .brand_service
        .transition(&mut *tx, brand_id, action, detail)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(locale, &app_state.i18n_store))?;

    tracing::info!("Marca {} -> {:?} por {}", brand_id, brand.status, user.0.id);
    Ok(Json(BrandView::from(brand)))
}

// POST /api/admin/brands/{id}/approve
#[utoipa::path(
    post,
    path = "/api/admin/brands/{id}/approve",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses((status = 200, body = BrandView), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = []))
)]
pub async fn approve_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(brand_id): Path<Uuid>,
) -> Result<Json<BrandView>, ApiError> {
    transition_brand(&app_state, &locale, &user, brand_id, BrandTransition::Approve, None).await
}

// POST /api/admin/brands/{id}/reject
#[utoipa::path(
    post,
    path = "/api/admin/brands/{id}/reject",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da marca")),
    request_body = RejectBrandPayload,
    responses((status = 200, body = BrandView), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = []))
)]
pub async fn reject_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(brand_id): Path<Uuid>,
    Json(payload): Json<RejectBrandPayload>,
) -> Result<Json<BrandView>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = Some((BrandField::RejectionReason, payload.reason.trim()));
    transition_brand(&app_state, &locale, &user, brand_id, BrandTransition::Reject, detail).await
}

// POST /api/admin/brands/{id}/pricing
#[utoipa::path(
    post,
    path = "/api/admin/brands/{id}/pricing",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da marca")),
    request_body = PricingTermsPayload,
    responses((status = 200, body = BrandView), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = []))
)]
pub async fn propose_pricing(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(brand_id): Path<Uuid>,
    Json(payload): Json<PricingTermsPayload>,
) -> Result<Json<BrandView>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = Some((BrandField::PricingTerms, payload.terms.trim()));
    transition_brand(&app_state, &locale, &user, brand_id, BrandTransition::ProposePricing, detail).await
}

// POST /api/admin/brands/{id}/contract
#[utoipa::path(
    post,
    path = "/api/admin/brands/{id}/contract",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da marca")),
    request_body = ContractPayload,
    responses((status = 200, body = BrandView), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = []))
)]
pub async fn send_contract(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(brand_id): Path<Uuid>,
    Json(payload): Json<ContractPayload>,
) -> Result<Json<BrandView>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = Some((BrandField::ContractReference, payload.reference.trim()));
    transition_brand(&app_state, &locale, &user, brand_id, BrandTransition::SendContract, detail).await
}

// POST /api/admin/brands/{id}/activate
#[utoipa::path(
    post,
    path = "/api/admin/brands/{id}/activate",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses((status = 200, body = BrandView), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = []))
)]
pub async fn activate_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(brand_id): Path<Uuid>,
) -> Result<Json<BrandView>, ApiError> {
    transition_brand(&app_state, &locale, &user, brand_id, BrandTransition::Activate, None).await
}

// =============================================================================
//  ÁREA 2: USUÁRIOS
// =============================================================================

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    responses((status = 200, body = Vec<CurrentUser>)),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<CurrentUser>>, ApiError> {
    let users = app_state
        .user_repo
        .list_users()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(users))
}

// PUT /api/admin/users/{id}/brand
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/brand",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = AssignBrandPayload,
    responses(
        (status = 204, description = "Vínculo atualizado"),
        (status = 404, description = "Usuário ou marca não encontrados")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AssignBrandPayload>,
) -> Result<StatusCode, ApiError> {
    // A marca precisa existir antes de vincular
    if let Some(brand_id) = payload.brand_id {
        let mut tx = get_rls_transaction(&app_state, &user)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
        app_state
            .brand_service
            .get(&mut *tx, brand_id)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
        tx.commit()
            .await
            .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;
    }

    let updated = app_state
        .user_repo
        .set_brand(user_id, payload.brand_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if !updated {
        return Err(AppError::ResourceNotFound("user".to_string()).to_api_error(&locale, &app_state.i18n_store));
    }

    tracing::info!("Usuário {} vinculado à marca {:?}", user_id, payload.brand_id);
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/admin/users/{id}/role
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = SetRolePayload,
    responses((status = 204, description = "Papel atualizado"), (status = 404, description = "Usuário não encontrado")),
    security(("api_jwt" = []))
)]
pub async fn set_role(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<SetRolePayload>,
) -> Result<StatusCode, ApiError> {
    let updated = app_state
        .user_repo
        .set_role(user_id, payload.role)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if !updated {
        return Err(AppError::ResourceNotFound("user".to_string()).to_api_error(&locale, &app_state.i18n_store));
    }

    tracing::info!("Usuário {} agora é {}", user_id, payload.role.as_str());
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: PEDIDOS
// =============================================================================

// POST /api/admin/orders
#[utoipa::path(
    post,
    path = "/api/admin/orders",
    tag = "Admin",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com itens", body = OrderDetail),
        (status = 400, description = "Pedido sem itens ou dados inválidos"),
        (status = 404, description = "Marca não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .order_service
        .create_order(&mut *tx, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/admin/orders
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    tag = "Admin",
    params(
        ("brand_id" = Option<Uuid>, Query, description = "Filtra por marca"),
        ("status" = Option<String>, Query, description = "Filtra pelo status do pedido")
    ),
    responses((status = 200, body = Vec<PurchaseOrder>)),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(filter): Query<OrderListQuery>,
) -> Result<Json<Vec<PurchaseOrder>>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let orders = app_state
        .order_service
        .list(&mut *tx, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(orders))
}

// GET /api/admin/orders/{id}
#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses((status = 200, body = OrderDetail), (status = 404, description = "Pedido não encontrado")),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetail>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .order_service
        .detail(&mut *tx, order_id, None)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// POST /api/admin/orders/{id}/status
#[utoipa::path(
    post,
    path = "/api/admin/orders/{id}/status",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = UpdateOrderStatusPayload,
    responses((status = 200, body = PurchaseOrder), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<Json<PurchaseOrder>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .order_service
        .update_status(&mut *tx, order_id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(order))
}

// =============================================================================
//  ÁREA 4: FATURAS
// =============================================================================

// POST /api/admin/invoices
#[utoipa::path(
    post,
    path = "/api/admin/invoices",
    tag = "Admin",
    request_body = CreateInvoicePayload,
    responses((status = 201, body = Invoice), (status = 400, description = "Dados inválidos")),
    security(("api_jwt" = []))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .invoice_service
        .create(&mut *tx, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

// GET /api/admin/invoices
#[utoipa::path(
    get,
    path = "/api/admin/invoices",
    tag = "Admin",
    params(
        ("brand_id" = Option<Uuid>, Query, description = "Filtra por marca"),
        ("status" = Option<String>, Query, description = "pending | paid | overdue")
    ),
    responses((status = 200, body = Vec<Invoice>)),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(filter): Query<InvoiceListQuery>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoices = app_state
        .invoice_service
        .list(&mut *tx, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoices))
}

// POST /api/admin/invoices/{id}/paid
#[utoipa::path(
    post,
    path = "/api/admin/invoices/{id}/paid",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = MarkPaidPayload,
    responses((status = 200, body = Invoice), (status = 409, description = "Fatura já paga")),
    security(("api_jwt" = []))
)]
pub async fn mark_invoice_paid(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<MarkPaidPayload>,
) -> Result<Json<Invoice>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .invoice_service
        .mark_paid(&mut *tx, invoice_id, payload.paid_date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoice))
}

// POST /api/admin/invoices/{id}/overdue
#[utoipa::path(
    post,
    path = "/api/admin/invoices/{id}/overdue",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses((status = 200, body = Invoice), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = []))
)]
pub async fn mark_invoice_overdue(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .invoice_service
        .mark_overdue(&mut *tx, invoice_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoice))
}

// =============================================================================
//  ÁREA 5: PROMOÇÕES
// =============================================================================

// GET /api/admin/promotions
#[utoipa::path(
    get,
    path = "/api/admin/promotions",
    tag = "Admin",
    params(("status" = Option<String>, Query, description = "pending | approved | rejected")),
    responses((status = 200, body = Vec<Promotion>)),
    security(("api_jwt" = []))
)]
pub async fn list_promotions(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<PromotionListQuery>,
) -> Result<Json<Vec<Promotion>>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let promotions = app_state
        .promotion_service
        .list(&mut *tx, None, query.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(promotions))
}

// POST /api/admin/promotions/{id}/review
#[utoipa::path(
    post,
    path = "/api/admin/promotions/{id}/review",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID da promoção")),
    request_body = ReviewPromotionPayload,
    responses((status = 200, body = Promotion), (status = 409, description = "Promoção já revisada")),
    security(("api_jwt" = []))
)]
pub async fn review_promotion(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(promotion_id): Path<Uuid>,
    Json(payload): Json<ReviewPromotionPayload>,
) -> Result<Json<Promotion>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let promotion = app_state
        .promotion_service
        .review(&mut *tx, promotion_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(promotion))
}

// =============================================================================
//  ÁREA 6: EXCLUSÃO EM MASSA
// =============================================================================

// POST /api/admin/data/delete
// O plano inteiro roda numa transação: ou apaga tudo, ou nada.
#[utoipa::path(
    post,
    path = "/api/admin/data/delete",
    tag = "Admin",
    request_body = DeletionScope,
    responses(
        (status = 200, description = "Linhas apagadas por etapa", body = DeletionReport),
        (status = 500, description = "Falha; nada foi apagado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_data(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(scope): Json<DeletionScope>,
) -> Result<Json<DeletionReport>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .data_service
        .delete(&mut *tx, scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("Exclusão {:?} concluída por {}: {} linha(s)", scope, user.0.id, report.total_affected);
    Ok(Json(report))
}
