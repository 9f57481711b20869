// src/db/dashboard_repo.rs

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::{AdminTotals, BrandTotals, StatusCount},
};

#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    // 1. Cards da marca (uma única leitura consistente)
    pub async fn brand_totals(&self, conn: &mut PgConnection, brand_id: Uuid) -> Result<BrandTotals, AppError> {
        let totals = sqlx::query_as::<_, BrandTotals>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM purchase_orders
                  WHERE brand_id = $1 AND acceptance_status = 'pending_review') AS awaiting_response,
                (SELECT COUNT(*) FROM purchase_orders
                  WHERE brand_id = $1 AND status NOT IN ('delivered', 'cancelled')) AS open_orders,
                (SELECT COALESCE(SUM(amount), 0) FROM invoices
                  WHERE brand_id = $1 AND status IN ('pending', 'overdue')) AS outstanding_amount,
                (SELECT COUNT(*) FROM invoices
                  WHERE brand_id = $1 AND status = 'overdue') AS overdue_invoices,
                (SELECT COUNT(*) FROM support_messages m
                  JOIN support_channels c ON c.id = m.channel_id
                  WHERE c.brand_id = $1 AND m.sender_role = 'admin' AND NOT m.is_read) AS unread_messages
            "#,
        )
        .bind(brand_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(totals)
    }

    // 2. Cards da equipe
    pub async fn admin_totals(&self, conn: &mut PgConnection) -> Result<AdminTotals, AppError> {
        let totals = sqlx::query_as::<_, AdminTotals>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM brands WHERE status = 'pending') AS brands_awaiting_approval,
                (SELECT COUNT(*) FROM brands WHERE status = 'active') AS active_brands,
                (SELECT COUNT(*) FROM purchase_orders
                  WHERE acceptance_status = 'pending_review') AS orders_awaiting_response,
                (SELECT COALESCE(SUM(amount), 0) FROM invoices
                  WHERE status IN ('pending', 'overdue')) AS outstanding_amount,
                (SELECT COUNT(*) FROM support_messages
                  WHERE sender_role = 'brand' AND NOT is_read) AS unread_messages,
                (SELECT COUNT(*) FROM promotions WHERE status = 'pending') AS promotions_to_review
            "#,
        )
        .fetch_one(&mut *conn)
        .await?;
        Ok(totals)
    }

    pub async fn brands_by_status(&self, conn: &mut PgConnection) -> Result<Vec<StatusCount>, AppError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            "SELECT status::text AS status, COUNT(*) AS total FROM brands GROUP BY status ORDER BY status",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    pub async fn orders_by_status(&self, conn: &mut PgConnection) -> Result<Vec<StatusCount>, AppError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            "SELECT status::text AS status, COUNT(*) AS total \
             FROM purchase_orders GROUP BY status ORDER BY status",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    pub async fn orders_by_acceptance(&self, conn: &mut PgConnection) -> Result<Vec<StatusCount>, AppError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            "SELECT acceptance_status::text AS status, COUNT(*) AS total \
             FROM purchase_orders GROUP BY acceptance_status ORDER BY acceptance_status",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }
}
