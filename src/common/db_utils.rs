use sqlx::{PgConnection, Postgres, Transaction};

use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::auth::AuthenticatedUser;

// ---
// Helper RLS: A "Chave" para o Banco de Dados
// ---
/// Abre uma transação e define as variáveis RLS (a "chave") do usuário.
/// As variáveis são locais à transação, então não vazam para a pool.
pub(crate) async fn get_rls_transaction(
    app_state: &AppState,
    user: &AuthenticatedUser,
) -> Result<Transaction<'static, Postgres>, AppError> {
    // 1. Abre a transação
    let mut tx = app_state.db_pool.begin().await?;

    // 2. Define a identidade, o papel e a marca
    let brand_id = user.0.brand_id.map(|id| id.to_string()).unwrap_or_default();
    set_rls_context(&mut *tx, &user.0.id.to_string(), user.0.role.as_str(), &brand_id).await?;

    Ok(tx)
}

/// Contexto "system": usado quando ainda não existe sessão (cadastro).
pub(crate) async fn set_system_context(conn: &mut PgConnection) -> Result<(), AppError> {
    set_rls_context(conn, "", "system", "").await
}

async fn set_rls_context(
    conn: &mut PgConnection,
    user_id: &str,
    role: &str,
    brand_id: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "SELECT set_config('app.user_id', $1, true), \
                set_config('app.role', $2, true), \
                set_config('app.brand_id', $3, true)",
    )
    .bind(user_id)
    .bind(role)
    .bind(brand_id)
    .execute(conn)
    .await?;

    Ok(())
}
