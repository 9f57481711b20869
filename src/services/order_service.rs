// src/services/order_service.rs

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::OrdersRepository,
    models::{
        orders::{
            ensure_awaiting_response, AcceptanceAction, AcceptanceStatus,
            CreateOrderPayload, OrderDetail, OrderListQuery, OrderStatus, PurchaseOrder,
            ResponseSummary,
        },
        status::Badge,
    },
};

#[derive(Clone)]
pub struct OrderService {
    orders_repo: OrdersRepository,
}

impl OrderService {
    pub fn new(orders_repo: OrdersRepository) -> Self {
        Self { orders_repo }
    }

    /// Cria o PO com as linhas. Quem chama fornece a transação.
    pub async fn create_order(
        &self,
        conn: &mut PgConnection,
        payload: &CreateOrderPayload,
    ) -> Result<OrderDetail, AppError> {
        let (line_totals, total) = payload.priced_lines()?;

        // Marca inexistente -> 404 antes de gravar qualquer coisa
        self.orders_repo
            .brand_name(&mut *conn, payload.brand_id)
            .await
            .map_err(|e| match e {
                AppError::DatabaseError(sqlx::Error::RowNotFound) => {
                    AppError::ResourceNotFound("brand".to_string())
                }
                other => other,
            })?;

        let order = self
            .orders_repo
            .create_order(&mut *conn, payload.brand_id, payload.notes.as_deref(), total)
            .await?;

        for (line, line_total) in payload.lines.iter().zip(line_totals) {
            self.orders_repo
                .add_line(
                    &mut *conn,
                    order.id,
                    line.sku.trim(),
                    line.description.as_deref(),
                    line.quantity_cases,
                    line.case_price,
                    line_total,
                )
                .await?;
        }

        tracing::info!("PO #{} criado para a marca {} (total {})", order.po_number, order.brand_id, total);
        self.detail(&mut *conn, order.id, None).await
    }

    pub async fn list(
        &self,
        conn: &mut PgConnection,
        filter: &OrderListQuery,
    ) -> Result<Vec<PurchaseOrder>, AppError> {
        self.orders_repo.list(&mut *conn, filter).await
    }

    /// Detalhe do pedido. Com `brand_id`, só encontra pedidos daquela marca.
    pub async fn detail(
        &self,
        conn: &mut PgConnection,
        order_id: Uuid,
        brand_id: Option<Uuid>,
    ) -> Result<OrderDetail, AppError> {
        let order = match brand_id {
            Some(brand_id) => self.orders_repo.find_for_brand(&mut *conn, brand_id, order_id).await?,
            None => self.orders_repo.find_by_id(&mut *conn, order_id).await?,
        }
        .ok_or_else(|| AppError::ResourceNotFound("order".to_string()))?;

        let lines = self.orders_repo.list_lines(&mut *conn, order.id).await?;
        let brand_name = self.orders_repo.brand_name(&mut *conn, order.brand_id).await?;

        Ok(build_detail(order, brand_name, lines))
    }

    /// Ciclo de vida (lado da distribuidora).
    pub async fn update_status(
        &self,
        conn: &mut PgConnection,
        order_id: Uuid,
        next: OrderStatus,
    ) -> Result<PurchaseOrder, AppError> {
        let order = self
            .orders_repo
            .find_by_id(&mut *conn, order_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("order".to_string()))?;

        if !order.status.can_transition_to(next) {
            return Err(AppError::invalid_transition(order.status, next));
        }

        self.orders_repo
            .update_status(&mut *conn, order_id, order.status, next)
            .await?
            .ok_or_else(|| AppError::invalid_transition(order.status, next))
    }

    /// Resposta da marca (aceitar / rejeitar / dúvida). A ação já chega validada.
    pub async fn respond(
        &self,
        conn: &mut PgConnection,
        brand_id: Uuid,
        order_id: Uuid,
        action: &AcceptanceAction,
    ) -> Result<OrderDetail, AppError> {
        let order = self
            .orders_repo
            .find_for_brand(&mut *conn, brand_id, order_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("order".to_string()))?;

        ensure_awaiting_response(order.acceptance_status)?;

        // O WHERE acceptance_status = 'pending_review' fecha a corrida
        let updated = self
            .orders_repo
            .record_response(&mut *conn, order_id, brand_id, action)
            .await?
            .ok_or(AppError::OrderAlreadyResponded)?;

        tracing::info!(
            "PO #{}: resposta da marca = {:?}",
            updated.po_number,
            updated.acceptance_status
        );

        let lines = self.orders_repo.list_lines(&mut *conn, updated.id).await?;
        let brand_name = self.orders_repo.brand_name(&mut *conn, updated.brand_id).await?;
        Ok(build_detail(updated, brand_name, lines))
    }
}

fn build_detail(
    order: PurchaseOrder,
    brand_name: String,
    lines: Vec<crate::models::orders::OrderLine>,
) -> OrderDetail {
    let response = ResponseSummary::of(&order);
    OrderDetail {
        status_badge: Badge::of(&order.status),
        can_respond: order.acceptance_status == AcceptanceStatus::PendingReview,
        brand_name,
        lines,
        response,
        header: order,
    }
}
