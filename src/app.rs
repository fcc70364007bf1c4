// src/app.rs

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

// Combina tudo no router principal
pub fn router(app_state: AppState) -> Router {
    let analytics_routes = Router::new()
        .route("/overview", get(handlers::analytics::get_overview))
        .route("/monthly", get(handlers::analytics::get_monthly))
        .route("/weekday", get(handlers::analytics::get_weekday))
        .route("/hourly", get(handlers::analytics::get_hourly))
        .route("/advisors", get(handlers::analytics::get_advisors))
        .route("/heatmap", get(handlers::analytics::get_heatmap))
        .route("/trend", get(handlers::analytics::get_trend))
        .route("/pipeline", get(handlers::analytics::get_pipeline))
        .route("/top-clients", get(handlers::analytics::get_top_clients))
        .route("/summary", get(handlers::analytics::get_summary));

    let chart_routes = Router::new()
        .route("/bar", get(handlers::charts::get_bar_chart))
        .route("/pie", get(handlers::charts::get_pie_chart))
        .route("/render", post(handlers::charts::render_chart));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(handlers::health::health))
        .nest("/api/analytics", analytics_routes)
        .nest("/api/charts", chart_routes)
        .with_state(app_state)
}
