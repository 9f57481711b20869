// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::auth::{CurrentUser, Role},
};

/// Nome do cookie de sessão.
pub const SESSION_COOKIE: &str = "session";

/// Token da sessão: cookie primeiro, depois `Authorization: Bearer`.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Resolve o usuário da sessão. `Ok(None)` quando não há token.
pub async fn resolve_session(
    app_state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<CurrentUser>, AppError> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };

    let identity_id = app_state.auth_service.validate_token(&token)?;
    app_state.auth_service.current_user(identity_id).await
}

async fn require_session(app_state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, AppError> {
    resolve_session(app_state, headers)
        .await?
        .ok_or(AppError::InvalidToken)
}

// ---
// Guardas das rotas de API (respondem JSON 401/403)
// ---
pub async fn api_auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = require_session(&app_state, request.headers())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub async fn admin_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = require_session(&app_state, request.headers())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if user.role != Role::Admin {
        tracing::warn!("Acesso negado à área da equipe para {}", user.id);
        return Err(AppError::AdminOnly.to_api_error(&locale, &app_state.i18n_store));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub async fn brand_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = require_session(&app_state, request.headers())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let brand_id = user
        .brand_id
        .ok_or_else(|| AppError::BrandNotLinked.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(BrandContext(brand_id));
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// ---
// Extratores
// ---

// Usuário autenticado, colocado nas extensions pelos guardas
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| unauthenticated(parts))
    }
}

// Marca do usuário (só existe atrás do brand_guard)
#[derive(Debug, Clone, Copy)]
pub struct BrandContext(pub Uuid);

impl<S> FromRequestParts<S> for BrandContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BrandContext>()
            .copied()
            .ok_or_else(|| unauthenticated(parts))
    }
}

// Sem acesso ao AppState aqui: monta a resposta sem catálogo (mensagem = chave).
fn unauthenticated(parts: &Parts) -> ApiError {
    let (status, key) = AppError::InvalidToken.status_and_key();
    tracing::debug!("Extrator sem sessão em {}", parts.uri.path());
    ApiError { status, error: key.to_string(), details: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; session=from-cookie"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn bearer_is_used_without_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn no_credentials_means_no_token() {
        assert_eq!(session_token(&HeaderMap::new()), None);
    }
}
