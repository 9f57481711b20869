// src/db/invoice_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::invoices::{Invoice, InvoiceItem, InvoiceListQuery, InvoiceStatus},
};

const INVOICE_COLUMNS: &str = r#"
    id, brand_id, order_id, invoice_number, amount, due_date, paid_date,
    status, created_at, updated_at
"#;

#[derive(Clone, Default)]
pub struct InvoiceRepository;

impl InvoiceRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        brand_id: Uuid,
        order_id: Option<Uuid>,
        amount: Decimal,
        due_date: NaiveDate,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "INSERT INTO invoices (brand_id, order_id, amount, due_date) VALUES ($1, $2, $3, $4) RETURNING {}",
            INVOICE_COLUMNS
        ))
        .bind(brand_id)
        .bind(order_id)
        .bind(amount)
        .bind(due_date)
        .fetch_one(executor)
        .await?;
        Ok(invoice)
    }

    pub async fn add_item<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        description: &str,
        quantity: i32,
        unit_price: Decimal,
        line_total: Decimal,
    ) -> Result<InvoiceItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InvoiceItem>(
            r#"
            INSERT INTO invoice_items (invoice_id, description, quantity, unit_price, line_total)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, invoice_id, description, quantity, unit_price, line_total
            "#,
        )
        .bind(invoice_id)
        .bind(description)
        .bind(quantity)
        .bind(unit_price)
        .bind(line_total)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    /// Marca dona do pedido (None se o pedido não existe).
    pub async fn order_brand<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let brand_id = sqlx::query_scalar::<_, Uuid>("SELECT brand_id FROM purchase_orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(executor)
            .await?;
        Ok(brand_id)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {} FROM invoices WHERE id = $1",
            INVOICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(invoice)
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &InvoiceListQuery) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {} FROM invoices
            WHERE ($1::uuid IS NULL OR brand_id = $1)
              AND ($2::invoice_status IS NULL OR status = $2)
            ORDER BY due_date DESC, invoice_number DESC
            "#,
            INVOICE_COLUMNS
        ))
        .bind(filter.brand_id)
        .bind(filter.status)
        .fetch_all(executor)
        .await?;
        Ok(invoices)
    }

    pub async fn list_items<'e, E>(&self, executor: E, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, InvoiceItem>(
            "SELECT id, invoice_id, description, quantity, unit_price, line_total \
             FROM invoice_items WHERE invoice_id = $1 ORDER BY description",
        )
        .bind(invoice_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// `paid_date` acompanha o status (constraint no banco).
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        from: InvoiceStatus,
        to: InvoiceStatus,
        paid_date: Option<NaiveDate>,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "UPDATE invoices SET status = $3, paid_date = $4, updated_at = NOW() \
             WHERE id = $1 AND status = $2 RETURNING {}",
            INVOICE_COLUMNS
        ))
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(paid_date)
        .fetch_optional(executor)
        .await?;
        Ok(invoice)
    }
}
