// src/middleware/access.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    config::AppState,
    middleware::auth::resolve_session,
    models::auth::{CurrentUser, Role},
};

/// Resultado do guarda de páginas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Redirect(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    AuthPage,
    Admin,
    Protected,
    Public,
}

const AUTH_PAGES: &[&str] = &["/login", "/signup", "/reset-password"];
const PROTECTED_PREFIXES: &[&str] = &[
    "/dashboard",
    "/onboarding",
    "/orders",
    "/invoices",
    "/support",
    "/promotions",
    "/settings",
];

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn classify(path: &str) -> PathClass {
    if AUTH_PAGES.contains(&path) {
        PathClass::AuthPage
    } else if matches_prefix(path, "/admin") {
        PathClass::Admin
    } else if PROTECTED_PREFIXES.iter().any(|p| matches_prefix(path, p)) {
        PathClass::Protected
    } else {
        PathClass::Public
    }
}

/// Login que volta para `requested` (caminho + query) depois de autenticar.
pub fn login_redirect(requested: &str) -> String {
    format!("/login?redirect={}", urlencoding::encode(requested))
}

/// Decisão pura: caminho pedido (com query) + papel da sessão (None = sem sessão).
pub fn decide(requested: &str, role: Option<Role>) -> AccessDecision {
    let path = requested.split_once('?').map_or(requested, |(path, _)| path);

    match (classify(path), role) {
        (PathClass::Public, _) => AccessDecision::Allow,
        (PathClass::AuthPage, None) => AccessDecision::Allow,
        (PathClass::AuthPage, Some(role)) => AccessDecision::Redirect(role.home_path().to_string()),
        (PathClass::Protected | PathClass::Admin, None) => {
            AccessDecision::Redirect(login_redirect(requested))
        }
        (PathClass::Admin, Some(Role::Admin)) => AccessDecision::Allow,
        (PathClass::Admin, Some(_)) => AccessDecision::Redirect("/dashboard".to_string()),
        (PathClass::Protected, Some(_)) => AccessDecision::Allow,
    }
}

/// Guarda das páginas. Qualquer falha ao buscar o papel vira "sem sessão".
pub async fn page_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user: Option<CurrentUser> = match resolve_session(&app_state, request.headers()).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Falha ao resolver sessão, tratando como anônimo: {}", e);
            None
        }
    };

    let requested = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.as_str().to_string());

    match decide(&requested, user.as_ref().map(|u| u.role)) {
        AccessDecision::Allow => {
            if let Some(user) = user {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
        AccessDecision::Redirect(target) => {
            tracing::debug!("{} -> {}", requested, target);
            Redirect::to(&target).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_users_are_sent_to_login_with_return_path() {
        assert_eq!(
            decide("/dashboard", None),
            AccessDecision::Redirect("/login?redirect=%2Fdashboard".into())
        );
        assert_eq!(
            decide("/onboarding/pricing", None),
            AccessDecision::Redirect("/login?redirect=%2Fonboarding%2Fpricing".into())
        );
        assert_eq!(
            decide("/admin/brands", None),
            AccessDecision::Redirect("/login?redirect=%2Fadmin%2Fbrands".into())
        );
    }

    #[test]
    fn return_path_keeps_the_query_encoded() {
        assert_eq!(
            decide("/orders?status=pending&page=2", None),
            AccessDecision::Redirect("/login?redirect=%2Forders%3Fstatus%3Dpending%26page%3D2".into())
        );
        // A query não muda a classificação do caminho
        assert_eq!(decide("/dashboard?tab=orders", Some(Role::Brand)), AccessDecision::Allow);
        assert_eq!(
            decide("/login?redirect=%2Forders", Some(Role::Brand)),
            AccessDecision::Redirect("/dashboard".into())
        );
    }

    #[test]
    fn signed_in_users_skip_auth_pages() {
        assert_eq!(decide("/login", Some(Role::Brand)), AccessDecision::Redirect("/dashboard".into()));
        assert_eq!(decide("/signup", Some(Role::Admin)), AccessDecision::Redirect("/admin".into()));
        assert_eq!(decide("/login", None), AccessDecision::Allow);
    }

    #[test]
    fn brands_cannot_open_admin_pages() {
        assert_eq!(decide("/admin", Some(Role::Brand)), AccessDecision::Redirect("/dashboard".into()));
        assert_eq!(decide("/admin", Some(Role::Admin)), AccessDecision::Allow);
    }

    #[test]
    fn public_paths_are_always_allowed() {
        assert_eq!(decide("/", None), AccessDecision::Allow);
        assert_eq!(decide("/auth/callback", None), AccessDecision::Allow);
        // Prefixo parecido não é área protegida
        assert_eq!(decide("/administrator", None), AccessDecision::Allow);
        assert_eq!(decide("/dashboards", None), AccessDecision::Allow);
    }
}
