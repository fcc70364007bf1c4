// src/handlers/charts.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::{error::AppError, i18n::Lang},
    config::AppState,
    handlers::analytics::AnalyticsQuery,
    middleware::i18n::Locale,
    models::chart::{ChartData, ChartDimensions, ChartKind, ChartSeries, RenderChartRequest},
    services::sales_feed::ViewScope,
};

// Query dos GET de gráfico. Sem flatten: o serde_urlencoded não converte
// números dentro de structs achatadas. Limites e defaults vêm de ChartDimensions.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ChartQuery {
    pub client_id: Option<String>,

    /// Janela da série `trend`: 7, 30, 90 ou 365.
    pub period: Option<u32>,

    #[serde(default)]
    pub series: ChartSeries,

    /// Largura lógica, 16..2048 (padrão 600).
    pub width: Option<u32>,

    /// Altura lógica, 16..2048 (padrão 300).
    pub height: Option<u32>,

    /// Device pixel ratio, 1..4 (padrão 1).
    pub dpr: Option<f32>,
}

impl ChartQuery {
    fn dimensions(&self) -> ChartDimensions {
        let defaults = ChartDimensions::default();
        ChartDimensions {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            dpr: self.dpr.unwrap_or(defaults.dpr),
        }
    }

    fn analytics(&self) -> AnalyticsQuery {
        AnalyticsQuery {
            client_id: self.client_id.clone(),
            period: self.period,
        }
    }
}

// O desenho é CPU puro: fica fora das threads do runtime
async fn render(
    app_state: &AppState,
    kind: ChartKind,
    data: ChartData,
    dims: ChartDimensions,
    lang: Lang,
) -> Result<Response, AppError> {
    let chart_service = app_state.chart_service.clone();
    let png = tokio::task::spawn_blocking(move || chart_service.render_png(kind, data, &dims, lang))
        .await
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("Renderização abortada: {e}")))??;

    let headers = [
        (header::CONTENT_TYPE, "image/png"),
        (header::CACHE_CONTROL, "no-store"),
    ];
    Ok((StatusCode::OK, headers, png).into_response())
}

async fn series_chart(
    app_state: AppState,
    kind: ChartKind,
    lang: Lang,
    scope: ViewScope,
    query: ChartQuery,
) -> Result<Response, AppError> {
    let dims = query.dimensions();
    dims.validate()?;
    let analytics = query.analytics();
    analytics.validate()?;

    // Cada série é um componente próprio da tela
    let scope = scope.within(query.series.as_str());
    let with_clients = query.series == ChartSeries::TopClients;
    let snapshot = app_state
        .feed
        .load(&scope, analytics.filter(), with_clients)
        .await?;

    let data = app_state.analytics_service.chart_data(
        &snapshot,
        query.series,
        analytics.trend_period(),
        lang,
    );

    render(&app_state, kind, data, dims, lang).await
}

// GET /api/charts/bar
#[utoipa::path(
    get,
    path = "/api/charts/bar",
    tag = "Charts",
    params(ChartQuery),
    responses(
        (status = 200, description = "Gráfico de barras em PNG", content_type = "image/png", body = Vec<u8>),
        (status = 400, description = "Dimensões ou período inválidos")
    )
)]
pub async fn get_bar_chart(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<ChartQuery>,
) -> Result<Response, AppError> {
    series_chart(app_state, ChartKind::Bar, lang, scope, query).await
}

// GET /api/charts/pie
#[utoipa::path(
    get,
    path = "/api/charts/pie",
    tag = "Charts",
    params(ChartQuery),
    responses(
        (status = 200, description = "Gráfico de pizza com legenda em PNG", content_type = "image/png", body = Vec<u8>),
        (status = 400, description = "Dimensões ou período inválidos")
    )
)]
pub async fn get_pie_chart(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    scope: ViewScope,
    Query(query): Query<ChartQuery>,
) -> Result<Response, AppError> {
    series_chart(app_state, ChartKind::Pie, lang, scope, query).await
}

// POST /api/charts/render
#[utoipa::path(
    post,
    path = "/api/charts/render",
    tag = "Charts",
    request_body = RenderChartRequest,
    responses(
        (status = 200, description = "Séries arbitrárias desenhadas em PNG", content_type = "image/png", body = Vec<u8>),
        (status = 400, description = "Séries ou dimensões inválidas")
    )
)]
pub async fn render_chart(
    State(app_state): State<AppState>,
    Locale(lang): Locale,
    Json(payload): Json<RenderChartRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let data = ChartData::new(payload.labels, payload.values);
    render(&app_state, payload.kind, data, payload.dimensions, lang).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults_match_chart_dimensions() {
        let query: ChartQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.series, ChartSeries::Monthly);

        let dims = query.dimensions();
        let defaults = ChartDimensions::default();
        assert_eq!(dims.width, defaults.width);
        assert_eq!(dims.height, defaults.height);
        assert_eq!(dims.dpr, defaults.dpr);
        assert!(dims.validate().is_ok());
    }

    #[test]
    fn query_uses_the_same_limits_as_the_render_body() {
        let query: ChartQuery =
            serde_json::from_value(serde_json::json!({"width": 5000, "dpr": 8.0})).unwrap();
        let dims = query.dimensions();
        assert_eq!(dims.height, 300);

        let errors = dims.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("width"));
        assert!(errors.field_errors().contains_key("dpr"));
        assert!(!errors.field_errors().contains_key("height"));
    }
}
