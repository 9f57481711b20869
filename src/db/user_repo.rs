// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{CurrentUser, Identity, Role},
};

// Colunas do usuário da sessão (perfil + e-mail da identidade)
const CURRENT_USER_SELECT: &str = r#"
    SELECT p.id, i.email, p.role, p.brand_id, p.full_name, p.created_at
    FROM profiles p
    JOIN identities i ON i.id = p.id
"#;

// Identidades, perfis e códigos de autenticação
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>, AppError> {
        let identity = sqlx::query_as::<_, Identity>(
            "SELECT id, email, password_hash, created_at, updated_at \
             FROM identities WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(identity)
    }

    pub async fn identity_exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM identities WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    // E-mail duplicado vira EmailAlreadyExists
    pub async fn create_identity<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
    ) -> Result<Identity, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Identity>(
            r#"
            INSERT INTO identities (email, password_hash)
            VALUES (lower($1), $2)
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return match db_err.constraint() {
                        Some("identities_email_key") | None => AppError::EmailAlreadyExists,
                        Some(other) => AppError::UniqueConstraintViolation(other.to_string()),
                    };
                }
            }
            e.into()
        })
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        identity_id: Uuid,
        password_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE identities SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(identity_id)
            .bind(password_hash)
            .execute(executor)
            .await?;
        Ok(())
    }

    // ---
    // Perfis
    // ---
    pub async fn find_current_user(&self, identity_id: Uuid) -> Result<Option<CurrentUser>, AppError> {
        let user = sqlx::query_as::<_, CurrentUser>(&format!("{} WHERE p.id = $1", CURRENT_USER_SELECT))
            .bind(identity_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Cria o perfil padrão (`brand`). Se já existir, não faz nada.
    pub async fn create_profile<'e, E>(
        &self,
        executor: E,
        identity_id: Uuid,
        brand_id: Option<Uuid>,
        full_name: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, role, brand_id, full_name)
            VALUES ($1, 'brand', $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(identity_id)
        .bind(brand_id)
        .bind(full_name)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<CurrentUser>, AppError> {
        let users = sqlx::query_as::<_, CurrentUser>(&format!("{} ORDER BY p.created_at DESC", CURRENT_USER_SELECT))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn set_brand(&self, user_id: Uuid, brand_id: Option<Uuid>) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE profiles SET brand_id = $2 WHERE id = $1")
            .bind(user_id)
            .bind(brand_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_role(&self, user_id: Uuid, role: Role) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE profiles SET role = $2 WHERE id = $1")
            .bind(user_id)
            .bind(role)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Códigos de uso único (callback / reset de senha)
    // ---
    pub async fn create_auth_code(
        &self,
        code: &str,
        identity_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO auth_codes (code, identity_id, expires_at) VALUES ($1, $2, $3)")
            .bind(code)
            .bind(identity_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Marca o código como usado e devolve a identidade. Expirado ou já usado: None.
    pub async fn consume_auth_code<'e, E>(&self, executor: E, code: &str) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let identity_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE auth_codes SET used_at = NOW()
            WHERE code = $1 AND used_at IS NULL AND expires_at > NOW()
            RETURNING identity_id
            "#,
        )
        .bind(code)
        .fetch_optional(executor)
        .await?;
        Ok(identity_id)
    }
}
