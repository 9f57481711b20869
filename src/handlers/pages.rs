// src/handlers/pages.rs
//
// Rotas de página (atrás do page_guard). Devolvem o "view model" em JSON
// ou redirecionam (303) para onde o usuário deve estar.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;

use crate::{
    common::{
        db_utils::get_rls_transaction,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::Role,
        brand::{BrandStatus, BrandView, OnboardingRoute},
        dashboard::{AuthPage, OnboardingPage},
    },
};

#[derive(Debug, Deserialize)]
pub struct AuthPageQuery {
    pub redirect: Option<String>,
    pub error: Option<String>,
    // Código de redefinição, repassado ao formulário sem ser consumido
    pub code: Option<String>,
}

fn auth_page(page: &'static str, query: AuthPageQuery) -> Json<AuthPage> {
    Json(AuthPage { page, error: query.error, redirect: query.redirect, code: None })
}

pub async fn login_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPage> {
    auth_page("login", query)
}

pub async fn signup_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPage> {
    auth_page("signup", query)
}

pub async fn reset_password_page(Query(query): Query<AuthPageQuery>) -> Json<AuthPage> {
    Json(AuthPage {
        page: "reset-password",
        error: query.error,
        redirect: query.redirect,
        code: query.code,
    })
}

/// GET /dashboard: só marcas ativas veem o painel.
pub async fn dashboard_page(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Response, ApiError> {
    if user.role == Role::Admin {
        return Ok(Redirect::to(Role::Admin.home_path()).into_response());
    }
    let Some(brand_id) = user.brand_id else {
        return Ok(Redirect::to(OnboardingRoute::Start.path()).into_response());
    };

    let auth_user = AuthenticatedUser(user);
    let mut tx = get_rls_transaction(&app_state, &auth_user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .brand_service
        .get(&mut *tx, brand_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if brand.status != BrandStatus::Active {
        let target = OnboardingRoute::for_status(Some(brand.status)).path();
        return Ok(Redirect::to(target).into_response());
    }

    let dashboard = app_state
        .dashboard_service
        .brand_dashboard(&mut *tx, brand_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dashboard).into_response())
}

/// GET /onboarding
pub async fn onboarding_page(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<Response, ApiError> {
    let page = load_onboarding(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    match page.step {
        OnboardingRoute::Start => Ok(Json(page).into_response()),
        other => Ok(Redirect::to(other.path()).into_response()),
    }
}

/// GET /onboarding/{step}: fora da etapa certa, redireciona para ela.
pub async fn onboarding_step_page(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(step): Path<String>,
) -> Result<Response, ApiError> {
    let requested = OnboardingRoute::from_step(&step).ok_or_else(|| {
        AppError::ResourceNotFound(format!("onboarding step '{}'", step))
            .to_api_error(&locale, &app_state.i18n_store)
    })?;

    let page = load_onboarding(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if page.step != requested {
        return Ok(Redirect::to(page.path).into_response());
    }
    Ok(Json(page).into_response())
}

async fn load_onboarding(app_state: &AppState, user: &AuthenticatedUser) -> Result<OnboardingPage, AppError> {
    let Some(brand_id) = user.0.brand_id else {
        let step = OnboardingRoute::for_status(None);
        return Ok(OnboardingPage { step, path: step.path(), brand: None });
    };

    let mut tx = get_rls_transaction(app_state, user).await?;
    let brand = app_state.brand_service.get(&mut *tx, brand_id).await?;
    tx.commit().await?;

    let step = OnboardingRoute::for_status(Some(brand.status));
    Ok(OnboardingPage { step, path: step.path(), brand: Some(BrandView::from(brand)) })
}

/// GET /admin (o guarda já garantiu o papel)
pub async fn admin_page(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<Response, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let dashboard = app_state
        .dashboard_service
        .admin_dashboard(&mut *tx)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(dashboard).into_response())
}
