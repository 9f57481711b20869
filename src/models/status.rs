// src/models/status.rs

use serde::Serialize;
use utoipa::ToSchema;

/// Tom visual do "badge" de status no frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Neutral,
    Info,
    Warning,
    Success,
    Danger,
}

/// Todo enum de status sabe como se apresentar.
pub trait StatusBadge {
    fn badge(&self) -> BadgeTone;
    fn label(&self) -> &'static str;
}

/// Forma serializável do badge, anexada às respostas.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Badge {
    pub tone: BadgeTone,
    pub label: &'static str,
}

impl Badge {
    pub fn of<S: StatusBadge>(status: &S) -> Self {
        Self {
            tone: status.badge(),
            label: status.label(),
        }
    }
}
