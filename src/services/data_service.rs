// src/services/data_service.rs

use sqlx::PgConnection;

use crate::{
    common::error::AppError,
    db::DataRepository,
    models::data::{DeletionReport, DeletionScope, StepReport},
};

/// Exclusão em massa. Roda dentro da transação de quem chama:
/// se qualquer passo falhar, nada é apagado.
#[derive(Clone)]
pub struct DataService {
    data_repo: DataRepository,
}

impl DataService {
    pub fn new(data_repo: DataRepository) -> Self {
        Self { data_repo }
    }

    pub async fn delete(&self, conn: &mut PgConnection, scope: DeletionScope) -> Result<DeletionReport, AppError> {
        let brand_filter = scope.brand_filter();
        let mut steps = Vec::new();

        for step in scope.plan() {
            let affected = self
                .data_repo
                .run_step(&mut *conn, step, brand_filter)
                .await
                .inspect_err(|e| tracing::error!("Exclusão falhou em {}: {}", step.table(), e))?;

            tracing::info!("Exclusão: {} -> {} linha(s)", step.table(), affected);
            steps.push(StepReport { step, table: step.table(), affected });
        }

        Ok(DeletionReport::new(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_db;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "precisa de Postgres em TEST_DATABASE_URL"]
    async fn deleting_a_brand_twice_is_harmless() {
        let mut tx = test_db::system_tx().await;
        let target = test_db::insert_brand(&mut tx, "Example Gin").await;
        let other = test_db::insert_brand(&mut tx, "Other Rum").await;
        let order_id = test_db::insert_order(&mut tx, target).await;

        // Fatura de outra marca apontando para o pedido da marca apagada
        sqlx::query(
            "INSERT INTO invoices (brand_id, order_id, amount, due_date) VALUES ($1, $2, 10, CURRENT_DATE)",
        )
        .bind(other)
        .bind(order_id)
        .execute(&mut *tx)
        .await
        .unwrap();

        let service = DataService::new(DataRepository::new());
        let scope = DeletionScope::Brand { brand_id: target };

        let first = service.delete(&mut tx, scope).await.unwrap();
        // desvínculo + pedido + marca
        assert_eq!(first.total_affected, 3);

        let second = service.delete(&mut tx, scope).await.unwrap();
        assert_eq!(second.total_affected, 0);

        let linked = sqlx::query_scalar::<_, Option<Uuid>>("SELECT order_id FROM invoices WHERE brand_id = $1")
            .bind(other)
            .fetch_one(&mut *tx)
            .await
            .unwrap();
        assert_eq!(linked, None);
    }
}
