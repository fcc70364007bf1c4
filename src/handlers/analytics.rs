// src/handlers/analytics.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::i18n::Locale,
    models::{
        analytics::{
            AdvisorBreakdown, AggregationBucket, ClientRankingEntry, DashboardOverview,
            HeatmapCell, MetricsSummary, PipelineEstimate, SalesTrend, TrendPeriod,
        },
        sales::SalesFilter,
    },
    services::sales_feed::{SalesSnapshot, ViewScope},
};

// Query comum a todas as rotas de analytics
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// Filtra a listagem do backend por cliente.
    pub client_id: Option<String>,

    /// Janela da tendência em dias: 7, 30, 90 ou 365.
    #[validate(custom(function = "validate_period"))]
    pub period: Option<u32>,
}

fn validate_period(days: u32) -> Result<(), ValidationError> {
    if TrendPeriod::from_days(days).is_none() {
        let mut err = ValidationError::new("unsupported_period");
        err.message = Some("period deve ser 7, 30, 90 ou 365".into());
        return Err(err);
    }
    Ok(())
}

impl AnalyticsQuery {
    pub fn filter(&self) -> SalesFilter {
        SalesFilter::for_client(self.client_id.as_deref())
    }

    pub fn trend_period(&self) -> TrendPeriod {
        self.period
            .and_then(TrendPeriod::from_days)
            .unwrap_or_default()
    }
}

// Valida, busca e devolve o snapshot
async fn load(
    app_state: &AppState,
    scope: &ViewScope,
    query: &AnalyticsQuery,
    with_clients: bool,
) -> Result<SalesSnapshot, AppError> {
    query.validate()?;
    app_state.feed.load(scope, query.filter(), with_clients).await
}

// GET /api/analytics/overview
#[utoipa::path(
    get,
    path = "/api/analytics/overview",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Todas as agregações do dashboard", body = DashboardOverview),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 502, description = "Backend de vendas indisponível")
    )
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load(&app_state, &scope, &query, true).await?;
    let overview = app_state
        .analytics_service
        .overview(&snapshot, query.trend_period(), lang);

    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/analytics/monthly
#[utoipa::path(
    get,
    path = "/api/analytics/monthly",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Vendas por mês (Jan..Dic)", body = Vec<AggregationBucket>)
    )
)]
pub async fn get_monthly(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load(&app_state, &scope, &query, false).await?;
    Ok((StatusCode::OK, Json(app_state.analytics_service.monthly(&snapshot, lang))))
}

// GET /api/analytics/weekday
#[utoipa::path(
    get,
    path = "/api/analytics/weekday",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Vendas por dia da semana (domingo primeiro)", body = Vec<AggregationBucket>)
    )
)]
pub async fn get_weekday(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load(&app_state, &scope, &query, false).await?;
    Ok((StatusCode::OK, Json(app_state.analytics_service.weekday(&snapshot, lang))))
}

// GET /api/analytics/hourly
#[utoipa::path(
    get,
    path = "/api/analytics/hourly",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Vendas por hora local", body = Vec<AggregationBucket>)
    )
)]
pub async fn get_hourly(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load(&app_state, &scope, &query, false).await?;
    Ok((StatusCode::OK, Json(app_state.analytics_service.hourly(&snapshot, lang))))
}

// GET /api/analytics/advisors
#[utoipa::path(
    get,
    path = "/api/analytics/advisors",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Top 10 asesores e série da pizza", body = AdvisorBreakdown)
    )
)]
pub async fn get_advisors(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load(&app_state, &scope, &query, false).await?;
    Ok((StatusCode::OK, Json(app_state.analytics_service.advisors(&snapshot, lang))))
}

// GET /api/analytics/heatmap
#[utoipa::path(
    get,
    path = "/api/analytics/heatmap",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Grade 4x7 das últimas quatro semanas", body = Vec<HeatmapCell>)
    )
)]
pub async fn get_heatmap(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load(&app_state, &scope, &query, false).await?;
    Ok((StatusCode::OK, Json(app_state.analytics_service.heatmap(&snapshot, lang))))
}

// GET /api/analytics/trend
#[utoipa::path(
    get,
    path = "/api/analytics/trend",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Vendas diárias e acumulado", body = SalesTrend),
        (status = 400, description = "Período não suportado")
    )
)]
pub async fn get_trend(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load(&app_state, &scope, &query, false).await?;
    let trend = app_state
        .analytics_service
        .trend(&snapshot, query.trend_period(), lang);

    Ok((StatusCode::OK, Json(trend)))
}

// GET /api/analytics/pipeline
#[utoipa::path(
    get,
    path = "/api/analytics/pipeline",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Funil estimado a partir das vendas fechadas", body = PipelineEstimate)
    )
)]
pub async fn get_pipeline(
    State(app_state): State<AppState>,
    scope: ViewScope,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load(&app_state, &scope, &query, false).await?;
    Ok((StatusCode::OK, Json(app_state.analytics_service.pipeline(&snapshot))))
}

// GET /api/analytics/top-clients
#[utoipa::path(
    get,
    path = "/api/analytics/top-clients",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Top 10 clientes com frequência de compra", body = Vec<ClientRankingEntry>)
    )
)]
pub async fn get_top_clients(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load(&app_state, &scope, &query, true).await?;
    Ok((StatusCode::OK, Json(app_state.analytics_service.top_clients(&snapshot, lang))))
}

// GET /api/analytics/summary
#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    tag = "Analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Mês atual contra o anterior", body = MetricsSummary)
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = load(&app_state, &scope, &query, false).await?;
    Ok((StatusCode::OK, Json(app_state.analytics_service.summary(&snapshot, lang))))
}
