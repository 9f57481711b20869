// src/services/support_service.rs

use sqlx::PgConnection;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::SupportRepository,
    models::{
        auth::{CurrentUser, Role},
        support::{can_access_channel, ChannelSummary, CreateChannelPayload, SupportChannel, SupportMessage},
    },
};

#[derive(Clone)]
pub struct SupportService {
    support_repo: SupportRepository,
}

impl SupportService {
    pub fn new(support_repo: SupportRepository) -> Self {
        Self { support_repo }
    }

    /// Marca vê os próprios canais; equipe vê todos.
    pub async fn list_channels(
        &self,
        conn: &mut PgConnection,
        user: &CurrentUser,
    ) -> Result<Vec<ChannelSummary>, AppError> {
        let brand_filter = match user.role {
            Role::Admin => None,
            Role::Brand => Some(user.brand_id.ok_or(AppError::BrandNotLinked)?),
        };
        self.support_repo
            .list_channels(&mut *conn, brand_filter, user.role)
            .await
    }

    pub async fn create_channel(
        &self,
        conn: &mut PgConnection,
        user: &CurrentUser,
        payload: &CreateChannelPayload,
    ) -> Result<SupportChannel, AppError> {
        let brand_id = match user.role {
            Role::Brand => user.brand_id.ok_or(AppError::BrandNotLinked)?,
            Role::Admin => payload.brand_id.ok_or_else(brand_required)?,
        };

        let channel = self
            .support_repo
            .create_channel(&mut *conn, brand_id, payload.name.trim(), payload.channel_type)
            .await?;

        tracing::info!("Canal de suporte {} aberto para a marca {}", channel.id, brand_id);
        Ok(channel)
    }

    /// Abrir a conversa marca como lidas as mensagens do outro lado.
    pub async fn open_conversation(
        &self,
        conn: &mut PgConnection,
        user: &CurrentUser,
        channel_id: Uuid,
    ) -> Result<Vec<SupportMessage>, AppError> {
        self.authorize(&mut *conn, user, channel_id).await?;

        let marked = self
            .support_repo
            .mark_read(&mut *conn, channel_id, user.role.counterpart())
            .await?;
        if marked > 0 {
            tracing::debug!("{} mensagem(ns) marcadas como lidas no canal {}", marked, channel_id);
        }

        self.support_repo.list_messages(&mut *conn, channel_id).await
    }

    /// Grava a mensagem. A publicação no feed fica com quem faz o commit.
    pub async fn send_message(
        &self,
        conn: &mut PgConnection,
        user: &CurrentUser,
        channel_id: Uuid,
        body: &str,
    ) -> Result<SupportMessage, AppError> {
        self.authorize(&mut *conn, user, channel_id).await?;

        self.support_repo
            .insert_message(&mut *conn, channel_id, user.id, user.role, body.trim())
            .await
    }

    async fn authorize(
        &self,
        conn: &mut PgConnection,
        user: &CurrentUser,
        channel_id: Uuid,
    ) -> Result<SupportChannel, AppError> {
        let channel = self
            .support_repo
            .find_channel(&mut *conn, channel_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("channel".to_string()))?;

        if !can_access_channel(user.role, user.brand_id, channel.brand_id) {
            tracing::warn!("Usuário {} tentou abrir o canal {}", user.id, channel_id);
            return Err(AppError::Forbidden);
        }

        Ok(channel)
    }
}

fn brand_required() -> AppError {
    let mut err = ValidationError::new("required");
    err.message = Some("required".into());
    let mut errors = ValidationErrors::new();
    errors.add("brandId", err);
    AppError::ValidationError(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_db;
    use crate::models::support::ChannelType;
    use chrono::Utc;

    fn user(id: Uuid, role: Role, brand_id: Option<Uuid>) -> CurrentUser {
        CurrentUser {
            id,
            email: "someone@example.com".into(),
            role,
            brand_id,
            full_name: None,
            created_at: Utc::now(),
        }
    }

    fn unread_in(channels: &[ChannelSummary], channel_id: Uuid) -> i64 {
        channels
            .iter()
            .find(|c| c.channel.id == channel_id)
            .map(|c| c.unread_count)
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "precisa de Postgres em TEST_DATABASE_URL"]
    async fn unread_counts_the_other_side_and_clears_on_open() {
        let mut tx = test_db::system_tx().await;
        let brand_id = test_db::insert_brand(&mut tx, "Example Gin").await;
        let owner = user(test_db::insert_identity(&mut tx).await, Role::Brand, Some(brand_id));
        let staff = user(test_db::insert_identity(&mut tx).await, Role::Admin, None);
        let service = SupportService::new(SupportRepository::new());

        let payload = CreateChannelPayload {
            name: "Orders".into(),
            channel_type: ChannelType::Orders,
            brand_id: None,
        };
        let channel = service.create_channel(&mut tx, &owner, &payload).await.unwrap();

        service.send_message(&mut tx, &staff, channel.id, "PO 1024 is ready").await.unwrap();
        service.send_message(&mut tx, &staff, channel.id, "Please confirm").await.unwrap();
        service.send_message(&mut tx, &owner, channel.id, "Looking now").await.unwrap();

        // Cada lado conta só o que o outro enviou
        let for_brand = service.list_channels(&mut tx, &owner).await.unwrap();
        let for_staff = service.list_channels(&mut tx, &staff).await.unwrap();
        assert_eq!(unread_in(&for_brand, channel.id), 2);
        assert_eq!(unread_in(&for_staff, channel.id), 1);

        let history = service.open_conversation(&mut tx, &owner, channel.id).await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.iter().filter(|m| m.sender_role == Role::Admin).all(|m| m.is_read));

        let for_brand = service.list_channels(&mut tx, &owner).await.unwrap();
        let for_staff = service.list_channels(&mut tx, &staff).await.unwrap();
        assert_eq!(unread_in(&for_brand, channel.id), 0);
        assert_eq!(unread_in(&for_staff, channel.id), 1);
    }

    #[tokio::test]
    #[ignore = "precisa de Postgres em TEST_DATABASE_URL"]
    async fn brands_cannot_open_other_brands_channels() {
        let mut tx = test_db::system_tx().await;
        let mine = test_db::insert_brand(&mut tx, "Example Gin").await;
        let theirs = test_db::insert_brand(&mut tx, "Other Rum").await;
        let staff = user(test_db::insert_identity(&mut tx).await, Role::Admin, None);
        let owner = user(test_db::insert_identity(&mut tx).await, Role::Brand, Some(mine));
        let service = SupportService::new(SupportRepository::new());

        let payload = CreateChannelPayload {
            name: "General".into(),
            channel_type: ChannelType::General,
            brand_id: Some(theirs),
        };
        let channel = service.create_channel(&mut tx, &staff, &payload).await.unwrap();

        let result = service.open_conversation(&mut tx, &owner, channel.id).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
