// src/db/support_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        support::{ChannelSummary, ChannelType, SupportChannel, SupportMessage},
    },
};

const MESSAGE_COLUMNS: &str = "id, channel_id, sender_id, sender_role, body, is_read, created_at";

#[derive(Clone, Default)]
pub struct SupportRepository;

impl SupportRepository {
    pub fn new() -> Self {
        Self
    }

    /// Canais com contagem de não lidas do ponto de vista de `viewer`.
    pub async fn list_channels<'e, E>(
        &self,
        executor: E,
        brand_id: Option<Uuid>,
        viewer: Role,
    ) -> Result<Vec<ChannelSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let channels = sqlx::query_as::<_, ChannelSummary>(
            r#"
            SELECT
                c.id, c.brand_id, c.name, c.channel_type, c.created_at,
                COALESCE(b.trading_name, b.legal_name) AS brand_name,
                COUNT(m.id) FILTER (WHERE m.sender_role = $2 AND NOT m.is_read) AS unread_count,
                MAX(m.created_at) AS last_message_at
            FROM support_channels c
            JOIN brands b ON b.id = c.brand_id
            LEFT JOIN support_messages m ON m.channel_id = c.id
            WHERE ($1::uuid IS NULL OR c.brand_id = $1)
            GROUP BY c.id, b.id
            ORDER BY last_message_at DESC NULLS LAST, c.created_at DESC
            "#,
        )
        .bind(brand_id)
        .bind(viewer.counterpart())
        .fetch_all(executor)
        .await?;
        Ok(channels)
    }

    pub async fn find_channel<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<SupportChannel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let channel = sqlx::query_as::<_, SupportChannel>(
            "SELECT id, brand_id, name, channel_type, created_at FROM support_channels WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(channel)
    }

    pub async fn create_channel<'e, E>(
        &self,
        executor: E,
        brand_id: Uuid,
        name: &str,
        channel_type: ChannelType,
    ) -> Result<SupportChannel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let channel = sqlx::query_as::<_, SupportChannel>(
            r#"
            INSERT INTO support_channels (brand_id, name, channel_type)
            VALUES ($1, $2, $3)
            RETURNING id, brand_id, name, channel_type, created_at
            "#,
        )
        .bind(brand_id)
        .bind(name)
        .bind(channel_type)
        .fetch_one(executor)
        .await?;
        Ok(channel)
    }

    pub async fn list_messages<'e, E>(&self, executor: E, channel_id: Uuid) -> Result<Vec<SupportMessage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let messages = sqlx::query_as::<_, SupportMessage>(&format!(
            "SELECT {} FROM support_messages WHERE channel_id = $1 ORDER BY created_at ASC, id ASC",
            MESSAGE_COLUMNS
        ))
        .bind(channel_id)
        .fetch_all(executor)
        .await?;
        Ok(messages)
    }

    pub async fn insert_message<'e, E>(
        &self,
        executor: E,
        channel_id: Uuid,
        sender_id: Uuid,
        sender_role: Role,
        body: &str,
    ) -> Result<SupportMessage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let message = sqlx::query_as::<_, SupportMessage>(&format!(
            "INSERT INTO support_messages (channel_id, sender_id, sender_role, body) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            MESSAGE_COLUMNS
        ))
        .bind(channel_id)
        .bind(sender_id)
        .bind(sender_role)
        .bind(body)
        .fetch_one(executor)
        .await?;
        Ok(message)
    }

    /// Marca como lidas as mensagens enviadas por `sender_role` no canal.
    pub async fn mark_read<'e, E>(&self, executor: E, channel_id: Uuid, sender_role: Role) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE support_messages SET is_read = TRUE \
             WHERE channel_id = $1 AND sender_role = $2 AND NOT is_read",
        )
        .bind(channel_id)
        .bind(sender_role)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
