// src/services/assistant.rs

use async_trait::async_trait;

use crate::{common::error::AppError, models::promotions::DraftCopyPayload};

/// Gerador de texto para campanhas. Nenhum provedor real vem configurado.
#[async_trait]
pub trait CopyAssistant: Send + Sync {
    async fn draft(&self, prompt: &str) -> Result<String, AppError>;
}

#[derive(Debug, Clone, Default)]
pub struct UnconfiguredAssistant;

#[async_trait]
impl CopyAssistant for UnconfiguredAssistant {
    async fn draft(&self, _prompt: &str) -> Result<String, AppError> {
        tracing::warn!("Pedido de rascunho recebido, mas nenhum assistente está configurado");
        Err(AppError::AssistantUnavailable)
    }
}

/// Monta o prompt a partir dos campos da promoção.
pub fn build_prompt(brand_name: &str, payload: &DraftCopyPayload) -> String {
    let mut prompt = format!(
        "Write short, upbeat trade promotion copy for the drinks brand \"{}\".\nCampaign: {}\n",
        brand_name,
        payload.title.trim()
    );

    if let Some(description) = payload.description.as_deref().filter(|d| !d.trim().is_empty()) {
        prompt.push_str(&format!("Details: {}\n", description.trim()));
    }
    if let Some(audience) = payload.audience.as_deref().filter(|a| !a.trim().is_empty()) {
        prompt.push_str(&format!("Audience: {}\n", audience.trim()));
    }

    prompt.push_str("Keep it under 80 words.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_only_filled_fields() {
        let payload = DraftCopyPayload {
            title: "Summer spritz".into(),
            description: Some("  ".into()),
            audience: Some("bars in Leeds".into()),
        };
        let prompt = build_prompt("Example Gin", &payload);
        assert!(prompt.contains("\"Example Gin\""));
        assert!(prompt.contains("Campaign: Summer spritz"));
        assert!(prompt.contains("Audience: bars in Leeds"));
        assert!(!prompt.contains("Details:"));
    }

    #[tokio::test]
    async fn unconfigured_assistant_reports_unavailable() {
        let result = UnconfiguredAssistant.draft("anything").await;
        assert!(matches!(result, Err(AppError::AssistantUnavailable)));
    }
}
