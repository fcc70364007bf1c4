// src/models/analytics.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// 1. Série simples (meses, dias da semana, horas, fatias da pizza)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregationBucket {
    pub label: String,
    pub count: u64,
}

impl AggregationBucket {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

// 2. Ranking (Top asesores)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

// 3. Heatmap das últimas 4 semanas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    // Coluna da grade (0..6), não o dia da semana do calendário
    pub day_of_week: u8,
    pub week: u8,
    pub date: NaiveDate,
    pub sales: u64,
}

// 4. Funil estimado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineEstimate {
    pub prospects: u64,
    pub contacted: u64,
    pub interested: u64,
    pub proposals: u64,
    pub closed: u64,
}

/// Multiplicadores do funil. Heurística de exibição, não dado medido.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelinePolicy {
    pub prospects: f64,
    pub contacted: f64,
    pub interested: f64,
    pub proposals: f64,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            prospects: 5.0,
            contacted: 3.5,
            interested: 2.5,
            proposals: 1.5,
        }
    }
}

impl std::str::FromStr for PipelinePolicy {
    type Err = anyhow::Error;

    /// Formato "5,3.5,2.5,1.5" (prospects, contacted, interested, proposals).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [prospects, contacted, interested, proposals]
                if values.iter().all(|v| v.is_finite() && *v >= 0.0) =>
            {
                Ok(Self {
                    prospects: *prospects,
                    contacted: *contacted,
                    interested: *interested,
                    proposals: *proposals,
                })
            }
            _ => anyhow::bail!("esperados 4 multiplicadores não negativos, recebido: {s}"),
        }
    }
}

// 5. Top clientes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientRankingEntry {
    pub client_id: String,
    pub name: String,
    pub sales: u64,
    pub advisor: Option<String>,
    // Média de dias entre vendas consecutivas
    pub frequency: f64,
    pub percentage: f64,
}

// 6. Tendência diária
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesTrend {
    pub period_days: u32,
    pub labels: Vec<String>,
    pub sales: Vec<u64>,
    pub cumulative: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendPeriod {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl TrendPeriod {
    pub const SUPPORTED_DAYS: [u32; 4] = [7, 30, 90, 365];

    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            7 => Some(Self::Week),
            30 => Some(Self::Month),
            90 => Some(Self::Quarter),
            365 => Some(Self::Year),
            _ => None,
        }
    }

    pub fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }
}

// 7. Cards do topo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub current_month: u64,
    pub previous_month: u64,
    // Variação percentual contra o mês anterior (0 quando o anterior é 0)
    pub trend: f64,
    pub daily_average: f64,
    pub total_sales: u64,
    pub active_advisors: u64,
    pub active_clients: u64,
}

// Asesores: ranking completo + série já dobrada para a pizza
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorBreakdown {
    pub ranking: Vec<RankingEntry>,
    pub pie: Vec<AggregationBucket>,
}

/// Tudo que a tela principal precisa, calculado de uma única busca.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub summary: MetricsSummary,
    pub monthly: Vec<AggregationBucket>,
    pub weekday: Vec<AggregationBucket>,
    pub hourly: Vec<AggregationBucket>,
    pub advisors: AdvisorBreakdown,
    pub heatmap: Vec<HeatmapCell>,
    pub trend: SalesTrend,
    pub pipeline: PipelineEstimate,
    pub top_clients: Vec<ClientRankingEntry>,
}
