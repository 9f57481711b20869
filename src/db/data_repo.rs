// src/db/data_repo.rs

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{common::error::AppError, models::data::DeletionStep};

#[derive(Clone, Default)]
pub struct DataRepository;

impl DataRepository {
    pub fn new() -> Self {
        Self
    }

    /// Executa um passo do plano; devolve as linhas afetadas.
    pub async fn run_step(
        &self,
        conn: &mut PgConnection,
        step: DeletionStep,
        brand_id: Option<Uuid>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(step.sql())
            .bind(brand_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}
