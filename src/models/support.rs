// src/models/support.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "channel_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    General,
    Orders,
    Invoices,
    Onboarding,
    Technical,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportChannel {
    pub id: Uuid,
    pub brand_id: Uuid,
    #[schema(example = "Order queries")]
    pub name: String,
    pub channel_type: ChannelType,
    pub created_at: DateTime<Utc>,
}

// Canal + contagem de não lidas para quem está olhando
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub channel: SupportChannel,
    pub brand_name: String,
    pub unread_count: i64,
    pub last_message_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportMessage {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub sender_role: Role,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannelPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub channel_type: ChannelType,
    // Obrigatório apenas quando quem cria é a equipe
    pub brand_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessagePayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub body: String,
}

fn validate_not_blank(body: &str) -> Result<(), validator::ValidationError> {
    if body.trim().is_empty() {
        let mut err = validator::ValidationError::new("required");
        err.message = Some("message_required".into());
        return Err(err);
    }
    Ok(())
}

/// Marca pode ver só os canais dela; equipe vê todos.
pub fn can_access_channel(role: Role, user_brand: Option<Uuid>, channel_brand: Uuid) -> bool {
    match role {
        Role::Admin => true,
        Role::Brand => user_brand == Some(channel_brand),
    }
}

/// Ids já entregues ao assinante (histórico + feed ao vivo).
#[derive(Debug, Default)]
pub struct SeenMessages {
    ids: HashSet<Uuid>,
}

impl SeenMessages {
    /// `true` se a mensagem ainda não tinha sido vista.
    pub fn admit(&mut self, message: &SupportMessage) -> bool {
        self.ids.insert(message.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(role: Role, is_read: bool) -> SupportMessage {
        SupportMessage {
            id: Uuid::new_v4(),
            channel_id: Uuid::nil(),
            sender_id: None,
            sender_role: role,
            body: "hello".into(),
            is_read,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn brands_only_reach_their_own_channels() {
        let mine = Uuid::new_v4();
        assert!(can_access_channel(Role::Brand, Some(mine), mine));
        assert!(!can_access_channel(Role::Brand, Some(mine), Uuid::new_v4()));
        assert!(!can_access_channel(Role::Brand, None, mine));
        assert!(can_access_channel(Role::Admin, None, mine));
    }

    #[test]
    fn seen_messages_dedupe_by_id() {
        let mut seen = SeenMessages::default();
        let m = message(Role::Brand, false);
        assert!(seen.admit(&m));
        assert!(!seen.admit(&m.clone()));
    }

    #[test]
    fn blank_messages_are_rejected() {
        let payload = SendMessagePayload { body: "   ".into() };
        assert!(payload.validate().is_err());
    }
}
