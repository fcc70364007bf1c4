// src/config.rs

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::FixedOffset;

use crate::{
    backend::{HttpSalesBackend, SalesBackend},
    models::analytics::PipelinePolicy,
    services::{
        analytics_service::AnalyticsService, chart_service::ChartService, sales_feed::SalesFeed,
    },
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

// Tudo que vem do ambiente, lido uma vez na partida
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    // Token de serviço, usado quando a requisição não traz o próprio Bearer
    pub backend_token: Option<String>,
    pub bind_addr: SocketAddr,
    pub fetch_timeout: Duration,
    pub utc_offset: FixedOffset,
    pub pipeline_policy: PipelinePolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_url = env::var("BACKEND_URL").context("BACKEND_URL deve ser definida")?;

        let backend_token = env::var("BACKEND_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR inválido")?;

        let fetch_timeout_secs = match env::var("FETCH_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().context("FETCH_TIMEOUT_SECS deve ser um inteiro")?,
            Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        let offset_minutes: i32 = match env::var("DASHBOARD_UTC_OFFSET_MINUTES") {
            Ok(raw) => raw
                .parse()
                .context("DASHBOARD_UTC_OFFSET_MINUTES deve ser um inteiro")?,
            Err(_) => 0,
        };
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60)
            .context("DASHBOARD_UTC_OFFSET_MINUTES fora do intervalo")?;

        let pipeline_policy = match env::var("PIPELINE_MULTIPLIERS") {
            Ok(raw) => raw.parse().context("PIPELINE_MULTIPLIERS inválido")?,
            Err(_) => PipelinePolicy::default(),
        };

        Ok(Self {
            backend_url,
            backend_token,
            bind_addr,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            utc_offset,
            pipeline_policy,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub feed: SalesFeed,
    pub analytics_service: AnalyticsService,
    pub chart_service: ChartService,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let backend = HttpSalesBackend::new(&config.backend_url, config.fetch_timeout)?;
        tracing::info!("✅ Backend de vendas configurado em {}", config.backend_url);
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_backend(config: Config, backend: Arc<dyn SalesBackend>) -> Self {
        let feed = SalesFeed::new(backend, config.fetch_timeout, config.backend_token.clone());
        let analytics_service = AnalyticsService::new(config.utc_offset, config.pipeline_policy);
        let chart_service = ChartService::default();

        Self {
            config: Arc::new(config),
            feed,
            analytics_service,
            chart_service,
        }
    }
}
