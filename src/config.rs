// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        BrandRepository, DashboardRepository, DataRepository, InvoiceRepository, OrdersRepository,
        ProductRepository, PromotionRepository, SupportRepository, UserRepository,
    },
    services::{
        assistant::{CopyAssistant, UnconfiguredAssistant},
        auth::AuthService,
        awrs::{AwrsVerifier, FormatVerifier},
        brand_service::BrandService,
        chat::ChatHub,
        dashboard_service::DashboardService,
        data_service::DataService,
        document_service::DocumentService,
        invoice_service::InvoiceService,
        order_service::OrderService,
        promotion_service::PromotionService,
        support_service::SupportService,
    },
};

/// Configuração lida do ambiente (.env).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub session_ttl_days: i64,
    pub auth_code_ttl_minutes: i64,
    pub fonts_dir: String,
    pub chat_buffer: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte de variáveis.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{} deve ser definida", key));

        fn parsed<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T> {
            match value {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("{} inválida: '{}'", key, raw)),
                None => Ok(default),
            }
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parsed(lookup("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5)?,
            session_ttl_days: parsed(lookup("SESSION_TTL_DAYS"), "SESSION_TTL_DAYS", 7)?,
            auth_code_ttl_minutes: parsed(lookup("AUTH_CODE_TTL_MINUTES"), "AUTH_CODE_TTL_MINUTES", 15)?,
            fonts_dir: lookup("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string()),
            chat_buffer: parsed(lookup("CHAT_BUFFER"), "CHAT_BUFFER", 256)?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub i18n_store: Arc<I18nStore>,
    pub chat_hub: ChatHub,
    pub user_repo: UserRepository,
    pub product_repo: ProductRepository,
    pub auth_service: AuthService,
    pub brand_service: BrandService,
    pub order_service: OrderService,
    pub invoice_service: InvoiceService,
    pub support_service: SupportService,
    pub promotion_service: PromotionService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
    pub data_service: DataService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_parts(config, db_pool)
    }

    /// Monta o gráfico de dependências sobre uma pool já criada.
    pub fn from_parts(config: AppConfig, db_pool: PgPool) -> anyhow::Result<Self> {
        let i18n_store = Arc::new(I18nStore::load()?);
        let chat_hub = ChatHub::new(config.chat_buffer);

        // --- Repositórios ---
        let user_repo = UserRepository::new(db_pool.clone());
        let brand_repo = BrandRepository::new();
        let product_repo = ProductRepository::new();
        let orders_repo = OrdersRepository::new();
        let invoice_repo = InvoiceRepository::new();

        // --- Integrações ---
        let awrs_verifier: Arc<dyn AwrsVerifier> = Arc::new(FormatVerifier);
        let copy_assistant: Arc<dyn CopyAssistant> = Arc::new(UnconfiguredAssistant);

        // --- Serviços ---
        let auth_service = AuthService::new(
            user_repo.clone(),
            brand_repo.clone(),
            db_pool.clone(),
            config.jwt_secret.clone(),
            config.session_ttl_days,
            config.auth_code_ttl_minutes,
        );
        let brand_service = BrandService::new(brand_repo.clone(), awrs_verifier);
        let order_service = OrderService::new(orders_repo.clone());
        let invoice_service = InvoiceService::new(invoice_repo.clone());
        let support_service = SupportService::new(SupportRepository::new());
        let promotion_service =
            PromotionService::new(PromotionRepository::new(), brand_repo.clone(), copy_assistant);
        let dashboard_service = DashboardService::new(
            DashboardRepository::new(),
            brand_repo.clone(),
            orders_repo,
            invoice_repo.clone(),
        );
        let document_service = DocumentService::new(invoice_repo, brand_repo, config.fonts_dir.clone());
        let data_service = DataService::new(DataRepository::new());

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            i18n_store,
            chat_hub,
            user_repo,
            product_repo,
            auth_service,
            brand_service,
            order_service,
            invoice_service,
            support_service,
            promotion_service,
            dashboard_service,
            document_service,
            data_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_missing() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/portal"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.session_ttl_days, 7);
        assert_eq!(config.auth_code_ttl_minutes, 15);
        assert_eq!(config.fonts_dir, "./fonts");
        assert_eq!(config.chat_buffer, 256);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/portal")]));
        assert!(result.unwrap_err().to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn malformed_numbers_are_reported() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/portal"),
            ("JWT_SECRET", "secret"),
            ("CHAT_BUFFER", "lots"),
        ]));
        assert!(result.is_err());
    }
}
