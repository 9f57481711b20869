// src/services/invoice_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InvoiceRepository,
    models::invoices::{
        ensure_order_belongs_to_brand, CreateInvoicePayload, Invoice, InvoiceItem, InvoiceListQuery,
    },
};

#[derive(Clone)]
pub struct InvoiceService {
    invoice_repo: InvoiceRepository,
}

impl InvoiceService {
    pub fn new(invoice_repo: InvoiceRepository) -> Self {
        Self { invoice_repo }
    }

    /// Fatura + itens. Com itens, o valor é a soma deles.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        payload: &CreateInvoicePayload,
    ) -> Result<Invoice, AppError> {
        let (item_totals, total) = payload.priced_items()?;

        if let Some(order_id) = payload.order_id {
            let order_brand = self.invoice_repo.order_brand(&mut *conn, order_id).await?;
            ensure_order_belongs_to_brand(order_brand, payload.brand_id)?;
        }

        let invoice = self
            .invoice_repo
            .create(&mut *conn, payload.brand_id, payload.order_id, total, payload.due_date)
            .await?;

        for (item, line_total) in payload.items.iter().zip(item_totals) {
            self.invoice_repo
                .add_item(
                    &mut *conn,
                    invoice.id,
                    item.description.trim(),
                    item.quantity,
                    item.unit_price,
                    line_total,
                )
                .await?;
        }

        tracing::info!("Fatura #{} emitida para a marca {}", invoice.invoice_number, invoice.brand_id);
        Ok(invoice)
    }

    pub async fn list(
        &self,
        conn: &mut PgConnection,
        filter: &InvoiceListQuery,
    ) -> Result<Vec<Invoice>, AppError> {
        self.invoice_repo.list(&mut *conn, filter).await
    }

    /// Fatura + itens. Com `brand_id`, faturas de outra marca viram 404.
    pub async fn get_with_items(
        &self,
        conn: &mut PgConnection,
        invoice_id: Uuid,
        brand_id: Option<Uuid>,
    ) -> Result<(Invoice, Vec<InvoiceItem>), AppError> {
        let invoice = self
            .invoice_repo
            .find_by_id(&mut *conn, invoice_id)
            .await?
            .filter(|i| brand_id.is_none_or(|b| b == i.brand_id))
            .ok_or_else(|| AppError::ResourceNotFound("invoice".to_string()))?;

        let items = self.invoice_repo.list_items(&mut *conn, invoice.id).await?;
        Ok((invoice, items))
    }

    pub async fn mark_paid(
        &self,
        conn: &mut PgConnection,
        invoice_id: Uuid,
        paid_date: Option<NaiveDate>,
    ) -> Result<Invoice, AppError> {
        let invoice = self.find(&mut *conn, invoice_id).await?;
        let next = invoice.status.mark_paid()?;
        let paid_date = paid_date.unwrap_or_else(|| Utc::now().date_naive());

        self.invoice_repo
            .update_status(&mut *conn, invoice_id, invoice.status, next, Some(paid_date))
            .await?
            .ok_or_else(|| AppError::invalid_transition(invoice.status, next))
    }

    pub async fn mark_overdue(&self, conn: &mut PgConnection, invoice_id: Uuid) -> Result<Invoice, AppError> {
        let invoice = self.find(&mut *conn, invoice_id).await?;
        let next = invoice.status.mark_overdue()?;

        self.invoice_repo
            .update_status(&mut *conn, invoice_id, invoice.status, next, None)
            .await?
            .ok_or_else(|| AppError::invalid_transition(invoice.status, next))
    }

    async fn find(&self, conn: &mut PgConnection, invoice_id: Uuid) -> Result<Invoice, AppError> {
        self.invoice_repo
            .find_by_id(&mut *conn, invoice_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("invoice".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_db;
    use rust_decimal::Decimal;

    #[tokio::test]
    #[ignore = "precisa de Postgres em TEST_DATABASE_URL"]
    async fn invoices_cannot_link_another_brands_order() {
        let mut tx = test_db::system_tx().await;
        let brand_a = test_db::insert_brand(&mut tx, "Example Gin").await;
        let brand_b = test_db::insert_brand(&mut tx, "Other Rum").await;
        let order_of_b = test_db::insert_order(&mut tx, brand_b).await;
        let service = InvoiceService::new(InvoiceRepository::new());

        let mut payload = CreateInvoicePayload {
            brand_id: brand_a,
            order_id: Some(order_of_b),
            amount: Decimal::from(120),
            due_date: Utc::now().date_naive(),
            items: Vec::new(),
        };
        let result = service.create(&mut tx, &payload).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        payload.brand_id = brand_b;
        let invoice = service.create(&mut tx, &payload).await.unwrap();
        assert_eq!(invoice.order_id, Some(order_of_b));
    }
}
