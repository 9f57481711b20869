// Apoio aos testes com banco real (marcados com #[ignore]).
// Rodar com: TEST_DATABASE_URL=postgres://... cargo test -- --ignored

use sqlx::{postgres::PgPoolOptions, PgConnection, Postgres, Transaction};
use uuid::Uuid;

use crate::common::db_utils::set_system_context;

/// Transação com contexto "system". Nunca é commitada: o drop desfaz tudo.
pub(crate) async fn system_tx() -> Transaction<'static, Postgres> {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL não definida");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("falha ao conectar no banco de teste");
    sqlx::migrate!().run(&pool).await.expect("falha nas migrações");

    let mut tx = pool.begin().await.expect("falha ao abrir transação");
    set_system_context(&mut *tx).await.expect("falha ao definir contexto");
    tx
}

pub(crate) async fn insert_brand(conn: &mut PgConnection, legal_name: &str) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO brands (legal_name) VALUES ($1) RETURNING id")
        .bind(legal_name)
        .fetch_one(conn)
        .await
        .unwrap()
}

pub(crate) async fn insert_identity(conn: &mut PgConnection) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO identities (email, password_hash) VALUES ($1, 'x') RETURNING id",
    )
    .bind(format!("{}@example.com", Uuid::new_v4().simple()))
    .fetch_one(conn)
    .await
    .unwrap()
}

pub(crate) async fn insert_order(conn: &mut PgConnection, brand_id: Uuid) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("INSERT INTO purchase_orders (brand_id) VALUES ($1) RETURNING id")
        .bind(brand_id)
        .fetch_one(conn)
        .await
        .unwrap()
}
