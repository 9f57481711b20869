// src/handlers/auth.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{AuthenticatedUser, SESSION_COOKIE},
        i18n::Locale,
    },
    models::auth::{
        safe_next_path, AuthResponse, CallbackParams, CurrentUser, LoginPayload,
        PasswordResetPayload, PasswordResetRequestPayload, Role, SignupPayload,
    },
};

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

// POST /api/auth/signup
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = SignupPayload,
    responses(
        (status = 201, description = "Conta criada; cookie de sessão definido", body = AuthResponse),
        (status = 400, description = "Dados inválidos (ex.: senhas não coincidem)"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn signup(
    State(app_state): State<AppState>,
    locale: Locale,
    jar: CookieJar,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // Nada é gravado se a validação falhar
    payload
        .validate_all()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (token, user) = app_state
        .auth_service
        .signup(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let body = AuthResponse { token: token.clone(), redirect_to: user.role.home_path().to_string() };
    Ok((StatusCode::CREATED, jar.add(session_cookie(token)), Json(body)))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão iniciada", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (token, user) = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let body = AuthResponse { token: token.clone(), redirect_to: user.role.home_path().to_string() };
    Ok((jar.add(session_cookie(token)), Json(body)))
}

// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 204, description = "Cookie de sessão removido"))
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, jar.remove(Cookie::build(SESSION_COOKIE).path("/")))
}

// POST /api/auth/password-reset/request
#[utoipa::path(
    post,
    path = "/api/auth/password-reset/request",
    tag = "Auth",
    request_body = PasswordResetRequestPayload,
    responses((status = 202, description = "Pedido aceito (mesmo para e-mails desconhecidos)"))
)]
pub async fn request_password_reset(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<PasswordResetRequestPayload>,
) -> Result<StatusCode, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .auth_service
        .request_password_reset(&payload.email)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::ACCEPTED)
}

// POST /api/auth/password-reset/confirm
#[utoipa::path(
    post,
    path = "/api/auth/password-reset/confirm",
    tag = "Auth",
    request_body = PasswordResetPayload,
    responses(
        (status = 204, description = "Senha redefinida"),
        (status = 400, description = "Código inválido ou senhas não coincidem")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<PasswordResetPayload>,
) -> Result<StatusCode, ApiError> {
    payload
        .validate_all()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .auth_service
        .reset_password(&payload.code, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/callback?code=...&next=...
/// Troca o código por uma sessão e redireciona conforme o papel.
pub async fn auth_callback(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    let Some(code) = params.code.as_deref().filter(|c| !c.trim().is_empty()) else {
        return Redirect::to("/login?error=invalid_code").into_response();
    };

    match app_state.auth_service.exchange_code(code).await {
        Ok((token, user)) => {
            let target = callback_target(&user, params.next.as_deref());
            tracing::info!("Callback: sessão criada para {}, indo para {}", user.id, target);
            (jar.add(session_cookie(token)), Redirect::to(&target)).into_response()
        }
        Err(e) => {
            tracing::warn!("Callback com código inválido: {}", e);
            Redirect::to("/login?error=invalid_code").into_response()
        }
    }
}

/// Equipe sempre vai para /admin; marca segue `next` quando é seguro.
fn callback_target(user: &CurrentUser, next: Option<&str>) -> String {
    match user.role {
        Role::Admin => user.role.home_path().to_string(),
        Role::Brand => safe_next_path(next)
            .unwrap_or(user.role.home_path())
            .to_string(),
    }
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Perfil da sessão", body = CurrentUser),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<CurrentUser> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            role,
            brand_id: None,
            full_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn admins_always_land_on_admin() {
        assert_eq!(callback_target(&user(Role::Admin), Some("/orders")), "/admin");
    }

    #[test]
    fn brands_follow_safe_next_paths_only() {
        assert_eq!(callback_target(&user(Role::Brand), Some("/reset-password")), "/reset-password");
        assert_eq!(callback_target(&user(Role::Brand), Some("https://evil.example")), "/dashboard");
        assert_eq!(callback_target(&user(Role::Brand), Some("/\\evil.example")), "/dashboard");
        assert_eq!(callback_target(&user(Role::Brand), None), "/dashboard");
    }
}
