// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Código de autenticação inválido ou expirado")]
    InvalidAuthCode,

    #[error("Acesso restrito à equipe")]
    AdminOnly,

    #[error("Usuário sem marca vinculada")]
    BrandNotLinked,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Transição inválida: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Pedido já respondido")]
    OrderAlreadyResponded,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Assistente indisponível")]
    AssistantUnavailable,

    #[error("Erro ao gerar documento: {0}")]
    DocumentError(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// O erro que sai na resposta HTTP (já traduzido).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Status HTTP + chave de tradução de cada variante.
    pub fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "email_already_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::InvalidAuthCode => (StatusCode::BAD_REQUEST, "invalid_auth_code"),
            AppError::AdminOnly => (StatusCode::FORBIDDEN, "admin_only"),
            AppError::BrandNotLinked => (StatusCode::FORBIDDEN, "brand_not_linked"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "resource_not_found"),
            AppError::DatabaseError(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "resource_not_found")
            }
            AppError::InvalidTransition { .. } => (StatusCode::CONFLICT, "invalid_transition"),
            AppError::OrderAlreadyResponded => (StatusCode::CONFLICT, "order_already_responded"),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "unique_violation"),
            AppError::AssistantUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "assistant_unavailable")
            }
            AppError::DocumentError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "document_error"),
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converte o erro de domínio no erro HTTP, traduzido para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(e.code.as_ref());
                            store.translate(&locale.0, key)
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                ApiError {
                    status,
                    error: store.translate(&locale.0, key),
                    details: Some(json!(details)),
                }
            }
            AppError::ResourceNotFound(resource) => ApiError {
                status,
                error: store.translate_with(&locale.0, key, &[("resource", resource.as_str())]),
                details: None,
            },
            AppError::InvalidTransition { from, to } => ApiError {
                status,
                error: store.translate_with(
                    &locale.0,
                    key,
                    &[("from", from.as_str()), ("to", to.as_str())],
                ),
                details: None,
            },
            AppError::UniqueConstraintViolation(detail) => ApiError {
                status,
                error: store.translate(&locale.0, key),
                details: Some(json!({ "conflict": detail })),
            },
            _ => ApiError {
                status,
                error: store.translate(&locale.0, key),
                details: None,
            },
        }
    }

    /// Atalho para transições inválidas de qualquer enum de status.
    pub fn invalid_transition(from: impl std::fmt::Debug, to: impl std::fmt::Debug) -> Self {
        AppError::InvalidTransition {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn validation_errors_are_translated_per_field() {
        let store = I18nStore::load().unwrap();
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("must_match");
        err.message = Some("passwords_do_not_match".into());
        errors.add("confirmPassword", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["confirmPassword"][0], "Passwords do not match");
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let (status, key) = AppError::DatabaseError(sqlx::Error::RowNotFound).status_and_key();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(key, "resource_not_found");
    }

    #[test]
    fn already_responded_is_a_conflict() {
        let (status, _) = AppError::OrderAlreadyResponded.status_and_key();
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
