// src/models/chart.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

// Qual série agregada vira gráfico nos endpoints GET
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ChartSeries {
    #[default]
    Monthly,
    Weekday,
    Hourly,
    Advisors,
    Trend,
    Pipeline,
    TopClients,
}

impl ChartSeries {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartSeries::Monthly => "monthly",
            ChartSeries::Weekday => "weekday",
            ChartSeries::Hourly => "hourly",
            ChartSeries::Advisors => "advisors",
            ChartSeries::Trend => "trend",
            ChartSeries::Pipeline => "pipeline",
            ChartSeries::TopClients => "topClients",
        }
    }
}

/// Séries paralelas prontas para desenhar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartData {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self { labels, values }
    }

    pub fn total(&self) -> f64 {
        self.values.iter().copied().filter(|v| v.is_finite()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn label(&self, index: usize) -> &str {
        self.labels.get(index).map(String::as_str).unwrap_or("")
    }
}

// Tamanho da área em pixels CSS + densidade da tela
#[derive(Debug, Clone, Copy, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ChartDimensions {
    #[serde(default = "default_width")]
    #[validate(range(min = 16, max = 2048, message = "width fora do intervalo 16..2048"))]
    pub width: u32,

    #[serde(default = "default_height")]
    #[validate(range(min = 16, max = 2048, message = "height fora do intervalo 16..2048"))]
    pub height: u32,

    #[serde(default = "default_dpr")]
    #[validate(range(min = 1.0, max = 4.0, message = "dpr fora do intervalo 1..4"))]
    pub dpr: f32,
}

fn default_width() -> u32 {
    600
}

fn default_height() -> u32 {
    300
}

fn default_dpr() -> f32 {
    1.0
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            dpr: default_dpr(),
        }
    }
}

// POST /api/charts/render
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_parallel_series"))]
pub struct RenderChartRequest {
    #[schema(example = "pie")]
    pub kind: ChartKind,

    #[validate(length(max = 500, message = "no máximo 500 categorias"))]
    #[schema(example = json!(["Ana", "Luis", "Marta"]))]
    pub labels: Vec<String>,

    #[schema(example = json!([12, 7, 3]))]
    pub values: Vec<f64>,

    #[serde(flatten)]
    #[validate(nested)]
    pub dimensions: ChartDimensions,
}

fn validate_parallel_series(request: &RenderChartRequest) -> Result<(), ValidationError> {
    if request.labels.len() != request.values.len() {
        let mut err = ValidationError::new("parallel_series");
        err.message = Some("labels e values devem ter o mesmo tamanho".into());
        return Err(err);
    }
    if request.values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("values devem ser números finitos não negativos".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_request_requires_parallel_series() {
        let request: RenderChartRequest = serde_json::from_value(json!({
            "kind": "bar",
            "labels": ["a", "b"],
            "values": [1.0]
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: RenderChartRequest = serde_json::from_value(json!({
            "kind": "pie",
            "labels": ["a"],
            "values": [1.0],
            "width": 320,
            "dpr": 2.0
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.dimensions.width, 320);
        assert_eq!(request.dimensions.height, 300);
    }

    #[test]
    fn dimensions_are_bounded() {
        let dims = ChartDimensions {
            dpr: 8.0,
            ..Default::default()
        };
        assert!(dims.validate().is_err());
    }
}
