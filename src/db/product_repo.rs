// src/db/product_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::products::{CreateProductPayload, Product},
};

#[derive(Clone, Default)]
pub struct ProductRepository;

impl ProductRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, brand_id: Uuid) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, brand_id, sku, name, case_size, case_price, created_at \
             FROM products WHERE brand_id = $1 ORDER BY sku",
        )
        .bind(brand_id)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    // SKU repetido na mesma marca vira 409
    pub async fn create<'e, E>(
        &self,
        executor: E,
        brand_id: Uuid,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (brand_id, sku, name, case_size, case_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, brand_id, sku, name, case_size, case_price, created_at
            "#,
        )
        .bind(brand_id)
        .bind(payload.sku.trim())
        .bind(payload.name.trim())
        .bind(payload.case_size)
        .bind(payload.case_price)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!("sku {}", payload.sku.trim()));
                }
            }
            e.into()
        })
    }
}
