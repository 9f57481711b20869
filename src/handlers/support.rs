// src/handlers/support.rs
//
// Chat de suporte. As mesmas rotas são montadas em /api/brand/support e
// /api/admin/support; quem pode ver o quê é decidido pelo SupportService.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::{Stream, StreamExt};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::get_rls_transaction,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::support::{
        ChannelSummary, CreateChannelPayload, SendMessagePayload, SupportChannel, SupportMessage,
    },
    services::chat::live_feed,
};

// GET …/support/channels
#[utoipa::path(
    get,
    path = "/api/brand/support/channels",
    tag = "Support",
    responses((status = 200, description = "Canais com contagem de não lidas", body = Vec<ChannelSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_channels(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<Json<Vec<ChannelSummary>>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let channels = app_state
        .support_service
        .list_channels(&mut *tx, &user.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(channels))
}

// POST …/support/channels
#[utoipa::path(
    post,
    path = "/api/brand/support/channels",
    tag = "Support",
    request_body = CreateChannelPayload,
    responses(
        (status = 201, body = SupportChannel),
        (status = 400, description = "Equipe precisa informar a marca")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_channel(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<CreateChannelPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let channel = app_state
        .support_service
        .create_channel(&mut *tx, &user.0, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(channel)))
}

// GET …/support/channels/{id}/messages
// Abrir a conversa marca como lidas as mensagens do outro lado.
#[utoipa::path(
    get,
    path = "/api/brand/support/channels/{id}/messages",
    tag = "Support",
    params(("id" = Uuid, Path, description = "ID do canal")),
    responses(
        (status = 200, description = "Histórico em ordem cronológica", body = Vec<SupportMessage>),
        (status = 403, description = "Canal de outra marca")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_messages(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(channel_id): Path<Uuid>,
) -> Result<Json<Vec<SupportMessage>>, ApiError> {
    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let messages = app_state
        .support_service
        .open_conversation(&mut *tx, &user.0, channel_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(messages))
}

// POST …/support/channels/{id}/messages
#[utoipa::path(
    post,
    path = "/api/brand/support/channels/{id}/messages",
    tag = "Support",
    params(("id" = Uuid, Path, description = "ID do canal")),
    request_body = SendMessagePayload,
    responses(
        (status = 201, body = SupportMessage),
        (status = 400, description = "Mensagem vazia")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(channel_id): Path<Uuid>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state
        .support_service
        .send_message(&mut *tx, &user.0, channel_id, payload.body.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    // Só publica o que já foi gravado
    app_state.chat_hub.publish(message.clone());

    Ok((StatusCode::CREATED, Json(message)))
}

/// GET …/support/channels/{id}/stream (SSE)
pub async fn stream_channel(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(channel_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    // Assina antes de ler o histórico para não perder nada no meio
    let rx = app_state.chat_hub.subscribe();

    let mut tx = get_rls_transaction(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let history = app_state
        .support_service
        .open_conversation(&mut *tx, &user.0, channel_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tx.commit()
        .await
        .map_err(|e| AppError::from(e).to_api_error(&locale, &app_state.i18n_store))?;

    tracing::debug!("SSE aberto: canal {} por {}", channel_id, user.0.id);

    let events = live_feed(channel_id, history, rx).map(|message| {
        Event::default()
            .event("message")
            .id(message.id.to_string())
            .json_data(&message)
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
