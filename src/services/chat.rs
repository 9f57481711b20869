// src/services/chat.rs

use futures::{stream, Stream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::models::support::{SeenMessages, SupportMessage};

/// Feed de mensagens em memória: um único sender, cada assinante filtra pelo canal.
#[derive(Clone)]
pub struct ChatHub {
    sender: broadcast::Sender<SupportMessage>,
}

impl ChatHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SupportMessage> {
        self.sender.subscribe()
    }

    /// Publica depois do commit. Sem assinantes não é erro.
    pub fn publish(&self, message: SupportMessage) {
        match self.sender.send(message) {
            Ok(receivers) => tracing::debug!("Mensagem entregue a {} assinante(s)", receivers),
            Err(_) => tracing::debug!("Mensagem publicada sem assinantes"),
        }
    }
}

/// Histórico primeiro, depois as mensagens ao vivo do canal, sem repetir ids.
/// O `rx` deve ser criado ANTES de carregar o histórico.
pub fn live_feed(
    channel_id: Uuid,
    history: Vec<SupportMessage>,
    rx: broadcast::Receiver<SupportMessage>,
) -> impl Stream<Item = SupportMessage> {
    let mut seen = SeenMessages::default();
    let replay: Vec<SupportMessage> = history.into_iter().filter(|m| seen.admit(m)).collect();

    let live = stream::unfold((rx, seen), move |(mut rx, mut seen)| async move {
        loop {
            match rx.recv().await {
                Ok(message) if message.channel_id == channel_id => {
                    if seen.admit(&message) {
                        return Some((message, (rx, seen)));
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    // Sem backfill: segue a partir do que ainda está no buffer
                    tracing::warn!("Assinante do canal {} perdeu {} mensagem(ns)", channel_id, skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    stream::iter(replay).chain(live)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use chrono::Utc;

    fn message(channel_id: Uuid, body: &str) -> SupportMessage {
        SupportMessage {
            id: Uuid::new_v4(),
            channel_id,
            sender_id: None,
            sender_role: Role::Admin,
            body: body.into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn replays_history_then_live_without_duplicates() {
        let hub = ChatHub::new(16);
        let channel = Uuid::new_v4();

        // Assina antes de carregar o histórico
        let rx = hub.subscribe();
        let old = message(channel, "old");
        let raced = message(channel, "raced");

        // "raced" chega pelo feed E pelo histórico
        hub.publish(raced.clone());
        hub.publish(message(Uuid::new_v4(), "other channel"));
        let fresh = message(channel, "fresh");
        hub.publish(fresh.clone());

        let feed = live_feed(channel, vec![old.clone(), raced.clone()], rx);
        let bodies: Vec<String> = feed.take(3).map(|m| m.body).collect().await;

        assert_eq!(bodies, vec!["old", "raced", "fresh"]);
    }

    #[tokio::test]
    async fn feed_ends_when_hub_is_dropped() {
        let hub = ChatHub::new(4);
        let channel = Uuid::new_v4();
        let rx = hub.subscribe();
        drop(hub);

        let items: Vec<SupportMessage> = live_feed(channel, vec![], rx).collect().await;
        assert!(items.is_empty());
    }
}
