// src/handlers/brand.rs
//
// API do parceiro (marca). Tudo aqui passa pelo brand_guard, então
// `BrandContext` sempre carrega a marca vinculada à sessão.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
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
    middleware::{
        auth::{AuthenticatedUser, BrandContext},
        i18n::Locale,
    },
    models::{
        brand::{
            AwrsCheckPayload, AwrsCheckResult, BrandTransition, BrandView, ShippingPayload,
            SignContractPayload, UpdateApplicationPayload,
        },
        invoices::{Invoice, InvoiceListQuery},
        orders::{OrderDetail, OrderListQuery, OrderResponsePayload, PurchaseOrder},
        products::{CreateProductPayload, Product},
        promotions::{CreatePromotionPayload, DraftCopyPayload, DraftCopyResponse, Promotion},
    },
};

// =============================================================================
//  ÁREA 1: FICHA E ONBOARDING
// =============================================================================

// GET /api/brand
#[utoipa::path(
    get,
    path = "/api/brand",
    tag = "Brand",
    responses(
        (status = 200, description = "Marca da sessão e etapa de onboarding", body = BrandView),
        (status = 403, description = "Usuário sem marca vinculada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
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

// PUT /api/brand/application
#[utoipa::path(
    put,
    path = "/api/brand/application",
    tag = "Brand",
    request_body = UpdateApplicationPayload,
    responses(
        (status = 200, description = "Ficha atualizada", body = BrandView),
        (status = 409, description = "Ficha já enviada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_application(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
    Json(payload): Json<UpdateApplicationPayload>,
) -> Result<Json<BrandView>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .brand_service
        .update_application(&mut *tx, brand_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(BrandView::from(brand)))
}

/// Aplica uma transição na marca da sessão dentro de uma transação RLS.
async fn transition_own_brand(
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

    Ok(Json(BrandView::from(brand)))
}

// POST /api/brand/application/submit
#[utoipa::path(
    post,
    path = "/api/brand/application/submit",
    tag = "Brand",
    responses(
        (status = 200, description = "Ficha enviada para análise", body = BrandView),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_application(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
) -> Result<Json<BrandView>, ApiError> {
    transition_own_brand(&app_state, &locale, &user, brand_id, BrandTransition::Submit, None).await
}

// POST /api/brand/pricing/accept
#[utoipa::path(
    post,
    path = "/api/brand/pricing/accept",
    tag = "Brand",
    responses((status = 200, body = BrandView), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = []))
)]
pub async fn accept_pricing(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
) -> Result<Json<BrandView>, ApiError> {
    transition_own_brand(&app_state, &locale, &user, brand_id, BrandTransition::AcceptPricing, None).await
}

// POST /api/brand/contract/sign
#[utoipa::path(
    post,
    path = "/api/brand/contract/sign",
    tag = "Brand",
    request_body = SignContractPayload,
    responses((status = 200, body = BrandView), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = []))
)]
pub async fn sign_contract(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
    Json(payload): Json<SignContractPayload>,
) -> Result<Json<BrandView>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = Some((BrandField::ContractSignedBy, payload.signed_by.trim()));
    transition_own_brand(&app_state, &locale, &user, brand_id, BrandTransition::SignContract, detail).await
}

// POST /api/brand/shipping
#[utoipa::path(
    post,
    path = "/api/brand/shipping",
    tag = "Brand",
    request_body = ShippingPayload,
    responses((status = 200, body = BrandView), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = []))
)]
pub async fn setup_shipping(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
    Json(payload): Json<ShippingPayload>,
) -> Result<Json<BrandView>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = Some((BrandField::ShippingNotes, payload.notes.trim()));
    transition_own_brand(&app_state, &locale, &user, brand_id, BrandTransition::SetupShipping, detail).await
}

// POST /api/brand/awrs/check
#[utoipa::path(
    post,
    path = "/api/brand/awrs/check",
    tag = "Brand",
    request_body = AwrsCheckPayload,
    responses((status = 200, description = "Resultado da checagem de formato", body = AwrsCheckResult)),
    security(("api_jwt" = []))
)]
pub async fn check_awrs(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
    Json(payload): Json<AwrsCheckPayload>,
) -> Result<Json<AwrsCheckResult>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let result = app_state
        .brand_service
        .check_awrs(&mut *tx, brand_id, &payload.awrs_number)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(result))
}

// =============================================================================
//  ÁREA 2: PRODUTOS
// =============================================================================

// GET /api/brand/products
#[utoipa::path(
    get,
    path = "/api/brand/products",
    tag = "Brand",
    responses((status = 200, body = Vec<Product>)),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
) -> Result<Json<Vec<Product>>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let products = app_state
        .product_repo
        .list(&mut *tx, brand_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(products))
}

// POST /api/brand/products
#[utoipa::path(
    post,
    path = "/api/brand/products",
    tag = "Brand",
    request_body = CreateProductPayload,
    responses(
        (status = 201, body = Product),
        (status = 409, description = "SKU já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_repo
        .create(&mut *tx, brand_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

// =============================================================================
//  ÁREA 3: PEDIDOS E ACEITE
// =============================================================================

// GET /api/brand/orders
#[utoipa::path(
    get,
    path = "/api/brand/orders",
    tag = "Brand",
    responses((status = 200, body = Vec<PurchaseOrder>)),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
) -> Result<Json<Vec<PurchaseOrder>>, ApiError> {
    let filter = OrderListQuery { brand_id: Some(brand_id), status: None };

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

// GET /api/brand/orders/{id}
#[utoipa::path(
    get,
    path = "/api/brand/orders/{id}",
    tag = "Brand",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido com itens e resumo da resposta", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetail>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .order_service
        .detail(&mut *tx, order_id, Some(brand_id))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// POST /api/brand/orders/{id}/response
#[utoipa::path(
    post,
    path = "/api/brand/orders/{id}/response",
    tag = "Brand",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = OrderResponsePayload,
    responses(
        (status = 200, description = "Resposta registrada", body = OrderDetail),
        (status = 400, description = "Motivo ou texto ausente"),
        (status = 409, description = "Pedido já respondido")
    ),
    security(("api_jwt" = []))
)]
pub async fn respond_to_order(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<OrderResponsePayload>,
) -> Result<Json<OrderDetail>, ApiError> {
    // Valida antes de abrir a transação: sem motivo, nenhuma ida ao banco
    let action = payload
        .into_action()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .order_service
        .respond(&mut *tx, brand_id, order_id, &action)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// =============================================================================
//  ÁREA 4: FATURAS
// =============================================================================

// GET /api/brand/invoices
#[utoipa::path(
    get,
    path = "/api/brand/invoices",
    tag = "Brand",
    responses((status = 200, body = Vec<Invoice>)),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let filter = InvoiceListQuery { brand_id: Some(brand_id), status: None };

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

// GET /api/brand/invoices/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/brand/invoices/{id}/pdf",
    tag = "Brand",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "PDF da fatura", content_type = "application/pdf"),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_invoice_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let (invoice, bytes) = app_state
        .document_service
        .generate_invoice_pdf(&mut *tx, invoice_id, Some(brand_id))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    let disposition = format!("inline; filename=\"invoice-{}.pdf\"", invoice.invoice_number);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

// =============================================================================
//  ÁREA 5: PROMOÇÕES
// =============================================================================

// GET /api/brand/promotions
#[utoipa::path(
    get,
    path = "/api/brand/promotions",
    tag = "Brand",
    responses((status = 200, body = Vec<Promotion>)),
    security(("api_jwt" = []))
)]
pub async fn list_promotions(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
) -> Result<Json<Vec<Promotion>>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let promotions = app_state
        .promotion_service
        .list(&mut *tx, Some(brand_id), None)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(promotions))
}

// POST /api/brand/promotions
#[utoipa::path(
    post,
    path = "/api/brand/promotions",
    tag = "Brand",
    request_body = CreatePromotionPayload,
    responses(
        (status = 201, description = "Campanha sugerida (pendente)", body = Promotion),
        (status = 400, description = "Datas ou orçamento inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn suggest_promotion(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
    Json(payload): Json<CreatePromotionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let promotion = app_state
        .promotion_service
        .suggest(&mut *tx, brand_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(promotion)))
}

// POST /api/brand/promotions/draft-copy
#[utoipa::path(
    post,
    path = "/api/brand/promotions/draft-copy",
    tag = "Brand",
    request_body = DraftCopyPayload,
    responses(
        (status = 200, body = DraftCopyResponse),
        (status = 503, description = "Assistente indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn draft_promotion_copy(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    BrandContext(brand_id): BrandContext,
    Json(payload): Json<DraftCopyPayload>,
) -> Result<Json<DraftCopyResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let copy = app_state
        .promotion_service
        .draft_copy(&mut *tx, brand_id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(DraftCopyResponse { copy }))
}
