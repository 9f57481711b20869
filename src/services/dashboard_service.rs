// src/services/dashboard_service.rs

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BrandRepository, DashboardRepository, InvoiceRepository, OrdersRepository},
    models::{
        brand::{BrandStatus, BrandView, OnboardingRoute},
        dashboard::{AdminDashboard, BrandDashboard},
        invoices::{InvoiceListQuery, InvoiceStatus},
        orders::OrderListQuery,
    },
};

const RECENT_ORDERS: usize = 5;

#[derive(Clone)]
pub struct DashboardService {
    dashboard_repo: DashboardRepository,
    brand_repo: BrandRepository,
    orders_repo: OrdersRepository,
    invoice_repo: InvoiceRepository,
}

impl DashboardService {
    pub fn new(
        dashboard_repo: DashboardRepository,
        brand_repo: BrandRepository,
        orders_repo: OrdersRepository,
        invoice_repo: InvoiceRepository,
    ) -> Self {
        Self { dashboard_repo, brand_repo, orders_repo, invoice_repo }
    }

    pub async fn brand_dashboard(
        &self,
        conn: &mut PgConnection,
        brand_id: Uuid,
    ) -> Result<BrandDashboard, AppError> {
        let brand = self
            .brand_repo
            .find_by_id(&mut *conn, brand_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("brand".to_string()))?;

        let onboarding = (brand.status != BrandStatus::Active)
            .then(|| OnboardingRoute::for_status(Some(brand.status)));

        let totals = self.dashboard_repo.brand_totals(&mut *conn, brand_id).await?;

        let mut recent_orders = self
            .orders_repo
            .list(&mut *conn, &OrderListQuery { brand_id: Some(brand_id), status: None })
            .await?;
        recent_orders.truncate(RECENT_ORDERS);

        let open_invoices = self
            .invoice_repo
            .list(&mut *conn, &InvoiceListQuery { brand_id: Some(brand_id), status: None })
            .await?
            .into_iter()
            .filter(|i| i.status != InvoiceStatus::Paid)
            .collect();

        Ok(BrandDashboard {
            brand: BrandView::from(brand),
            onboarding,
            totals,
            recent_orders,
            open_invoices,
        })
    }

    pub async fn admin_dashboard(&self, conn: &mut PgConnection) -> Result<AdminDashboard, AppError> {
        let totals = self.dashboard_repo.admin_totals(&mut *conn).await?;
        let brands_by_status = self.dashboard_repo.brands_by_status(&mut *conn).await?;
        let orders_by_status = self.dashboard_repo.orders_by_status(&mut *conn).await?;
        let orders_by_acceptance = self.dashboard_repo.orders_by_acceptance(&mut *conn).await?;

        Ok(AdminDashboard {
            totals,
            brands_by_status,
            orders_by_status,
            orders_by_acceptance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_db;

    #[tokio::test]
    #[ignore = "precisa de Postgres em TEST_DATABASE_URL"]
    async fn admin_dashboard_groups_orders_by_lifecycle_and_acceptance() {
        let mut tx = test_db::system_tx().await;
        let brand_id = test_db::insert_brand(&mut tx, "Example Gin").await;
        test_db::insert_order(&mut tx, brand_id).await;
        let dispatched = test_db::insert_order(&mut tx, brand_id).await;
        sqlx::query("UPDATE purchase_orders SET status = 'dispatched' WHERE id = $1")
            .bind(dispatched)
            .execute(&mut *tx)
            .await
            .unwrap();

        let service = DashboardService::new(
            DashboardRepository::new(),
            BrandRepository::new(),
            OrdersRepository::new(),
            InvoiceRepository::new(),
        );
        let dashboard = service.admin_dashboard(&mut tx).await.unwrap();

        let statuses: Vec<&str> = dashboard.orders_by_status.iter().map(|c| c.status.as_str()).collect();
        assert!(statuses.contains(&"pending"));
        assert!(statuses.contains(&"dispatched"));
        assert!(dashboard
            .orders_by_acceptance
            .iter()
            .any(|c| c.status == "pending_review" && c.total >= 2));
    }
}
