// src/db/orders_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orders::{AcceptanceAction, OrderLine, OrderListQuery, OrderStatus, PurchaseOrder},
};

const ORDER_COLUMNS: &str = r#"
    id, brand_id, po_number, status, acceptance_status, acceptance_comment,
    rejection_reason, responded_at, total_amount, notes, created_at, updated_at
"#;

#[derive(Clone, Default)]
pub struct OrdersRepository;

impl OrdersRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        brand_id: Uuid,
        notes: Option<&str>,
        total_amount: Decimal,
    ) -> Result<PurchaseOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "INSERT INTO purchase_orders (brand_id, notes, total_amount) VALUES ($1, $2, $3) RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(brand_id)
        .bind(notes)
        .bind(total_amount)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn add_line<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        sku: &str,
        description: Option<&str>,
        quantity_cases: i32,
        case_price: Decimal,
        line_total: Decimal,
    ) -> Result<OrderLine, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let line = sqlx::query_as::<_, OrderLine>(
            r#"
            INSERT INTO po_items (order_id, sku, description, quantity_cases, case_price, line_total)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, order_id, sku, description, quantity_cases, case_price, line_total
            "#,
        )
        .bind(order_id)
        .bind(sku)
        .bind(description)
        .bind(quantity_cases)
        .bind(case_price)
        .bind(line_total)
        .fetch_one(executor)
        .await?;
        Ok(line)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<PurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {} FROM purchase_orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    // Filtra pela marca explicitamente, além do RLS
    pub async fn find_for_brand<'e, E>(
        &self,
        executor: E,
        brand_id: Uuid,
        id: Uuid,
    ) -> Result<Option<PurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {} FROM purchase_orders WHERE id = $1 AND brand_id = $2",
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(brand_id)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &OrderListQuery) -> Result<Vec<PurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let orders = sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            SELECT {} FROM purchase_orders
            WHERE ($1::uuid IS NULL OR brand_id = $1)
              AND ($2::order_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            ORDER_COLUMNS
        ))
        .bind(filter.brand_id)
        .bind(filter.status)
        .fetch_all(executor)
        .await?;
        Ok(orders)
    }

    pub async fn list_lines<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<OrderLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, OrderLine>(
            "SELECT id, order_id, sku, description, quantity_cases, case_price, line_total \
             FROM po_items WHERE order_id = $1 ORDER BY sku",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;
        Ok(lines)
    }

    pub async fn brand_name<'e, E>(&self, executor: E, brand_id: Uuid) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let name = sqlx::query_scalar::<_, String>(
            "SELECT COALESCE(trading_name, legal_name) FROM brands WHERE id = $1",
        )
        .bind(brand_id)
        .fetch_one(executor)
        .await?;
        Ok(name)
    }

    /// Ciclo de vida; a checagem `status = $2` evita corrida entre admins.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<PurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "UPDATE purchase_orders SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    /// Grava a resposta da marca. Só sai de pending_review uma vez.
    pub async fn record_response<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        brand_id: Uuid,
        action: &AcceptanceAction,
    ) -> Result<Option<PurchaseOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            UPDATE purchase_orders SET
                acceptance_status = $3,
                rejection_reason = $4,
                acceptance_comment = $5,
                responded_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND brand_id = $2 AND acceptance_status = 'pending_review'
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(brand_id)
        .bind(action.resulting_status())
        .bind(action.reason())
        .bind(action.comment())
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }
}
