// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Analytics ---
        handlers::analytics::get_overview,
        handlers::analytics::get_monthly,
        handlers::analytics::get_weekday,
        handlers::analytics::get_hourly,
        handlers::analytics::get_advisors,
        handlers::analytics::get_heatmap,
        handlers::analytics::get_trend,
        handlers::analytics::get_pipeline,
        handlers::analytics::get_top_clients,
        handlers::analytics::get_summary,

        // --- Charts ---
        handlers::charts::get_bar_chart,
        handlers::charts::get_pie_chart,
        handlers::charts::render_chart,
    ),
    components(
        schemas(
            handlers::health::HealthStatus,

            // --- Analytics ---
            models::analytics::AggregationBucket,
            models::analytics::RankingEntry,
            models::analytics::AdvisorBreakdown,
            models::analytics::HeatmapCell,
            models::analytics::SalesTrend,
            models::analytics::PipelineEstimate,
            models::analytics::ClientRankingEntry,
            models::analytics::MetricsSummary,
            models::analytics::DashboardOverview,

            // --- Charts ---
            models::chart::ChartKind,
            models::chart::ChartSeries,
            models::chart::ChartData,
            models::chart::ChartDimensions,
            models::chart::RenderChartRequest,
        )
    ),
    tags(
        (name = "Health", description = "Estado do serviço"),
        (name = "Analytics", description = "Agregações de vendas para o dashboard"),
        (name = "Charts", description = "Gráficos de barras e pizza em PNG")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        // O token é repassado à API de vendas sem ser validado aqui
        components.add_security_scheme(
            "backend_bearer",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
