// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

// ---
// Papel do usuário
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Brand,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Brand => "brand",
            Role::Admin => "admin",
        }
    }

    /// O "outro lado" da conversa de suporte.
    pub fn counterpart(&self) -> Role {
        match self {
            Role::Brand => Role::Admin,
            Role::Admin => Role::Brand,
        }
    }

    /// Página inicial de cada papel.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Brand => "/dashboard",
            Role::Admin => "/admin",
        }
    }
}

// Identidade (credenciais) vinda do banco
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O usuário da sessão: perfil + e-mail
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Uuid,
    #[schema(example = "owner@example-gin.co.uk")]
    pub email: String,
    pub role: Role,
    pub brand_id: Option<Uuid>,
    #[schema(example = "Jane Doe")]
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "owner@example-gin.co.uk")]
    pub email: String,
    #[validate(length(min = 8, message = "password_too_short"))]
    pub password: String,
    pub confirm_password: String,
    #[validate(length(min = 1, message = "required"))]
    pub full_name: String,
    #[schema(example = "Example Gin Co.")]
    pub brand_name: Option<String>,
}

impl SignupPayload {
    /// Validação completa: regras dos campos + confirmação da senha.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        validate_with_password_match(self, &self.password, &self.confirm_password)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequestPayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetPayload {
    #[validate(length(min = 1, message = "required"))]
    pub code: String,
    #[validate(length(min = 8, message = "password_too_short"))]
    pub password: String,
    pub confirm_password: String,
}

impl PasswordResetPayload {
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        validate_with_password_match(self, &self.password, &self.confirm_password)
    }
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[schema(example = "/dashboard")]
    pub redirect_to: String,
}

// Query do callback (/auth/callback?code=...&next=...)
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub next: Option<String>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // ID da identidade
    pub exp: usize, // Expiração
    pub iat: usize, // Emissão
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignBrandPayload {
    pub brand_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetRolePayload {
    pub role: Role,
}

// ---
// Validações
// ---
fn validate_with_password_match<T: Validate>(
    payload: &T,
    password: &str,
    confirm: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = match payload.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(e) => e,
    };

    if let Err(e) = check_passwords_match(password, confirm) {
        errors.add("confirmPassword", e);
    }

    if errors.errors().is_empty() { Ok(()) } else { Err(errors) }
}

pub fn check_passwords_match(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password != confirm {
        let mut err = ValidationError::new("must_match");
        err.message = Some("passwords_do_not_match".into());
        return Err(err);
    }
    Ok(())
}

/// Só aceitamos redirecionamentos relativos ao próprio portal.
/// Navegadores tratam `\` como `/`, então `/\host` vale como `//host`.
pub fn safe_next_path(next: Option<&str>) -> Option<&str> {
    next.filter(|p| {
        p.starts_with('/')
            && !p.starts_with("//")
            && !p.contains("://")
            && !p.contains('\\')
            && !p.chars().any(char::is_control)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(password: &str, confirm: &str) -> SignupPayload {
        SignupPayload {
            email: "owner@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
            full_name: "Owner".into(),
            brand_name: None,
        }
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let errors = signup("abcd1234", "abcd1235").validate_all().unwrap_err();
        let field = errors.field_errors();
        let confirm = field.get("confirmPassword").expect("confirmPassword error");
        assert_eq!(confirm[0].message.as_deref(), Some("passwords_do_not_match"));
    }

    #[test]
    fn matching_passwords_pass() {
        assert!(signup("abcd1234", "abcd1234").validate_all().is_ok());
    }

    #[test]
    fn field_rules_and_mismatch_are_reported_together() {
        let mut payload = signup("short", "other");
        payload.email = "not-an-email".into();
        let errors = payload.validate_all().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("confirmPassword"));
    }

    #[test]
    fn only_relative_next_paths_are_followed() {
        assert_eq!(safe_next_path(Some("/orders")), Some("/orders"));
        assert_eq!(safe_next_path(Some("//evil.example")), None);
        assert_eq!(safe_next_path(Some("https://evil.example")), None);
        assert_eq!(safe_next_path(Some("/\\evil.example")), None);
        assert_eq!(safe_next_path(Some("/orders\\..\\x")), None);
        assert_eq!(safe_next_path(Some("/\t/evil.example")), None);
        assert_eq!(safe_next_path(Some("/orders\n")), None);
        assert_eq!(safe_next_path(None), None);
    }

    #[test]
    fn roles_know_their_home_and_counterpart() {
        assert_eq!(Role::Admin.home_path(), "/admin");
        assert_eq!(Role::Brand.home_path(), "/dashboard");
        assert_eq!(Role::Brand.counterpart(), Role::Admin);
    }
}
