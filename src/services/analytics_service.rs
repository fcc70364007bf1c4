// src/services/analytics_service.rs

use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    common::i18n::Lang,
    models::{
        analytics::{
            AdvisorBreakdown, AggregationBucket, ClientRankingEntry, DashboardOverview,
            HeatmapCell, MetricsSummary, PipelineEstimate, PipelinePolicy, SalesTrend,
            TrendPeriod,
        },
        chart::{ChartData, ChartSeries},
    },
    services::{
        aggregator::{self, AggregationContext},
        sales_feed::SalesSnapshot,
    },
};

// Liga o snapshot buscado às agregações, com o fuso e a política do config.
#[derive(Clone)]
pub struct AnalyticsService {
    offset: FixedOffset,
    policy: PipelinePolicy,
}

impl AnalyticsService {
    pub fn new(offset: FixedOffset, policy: PipelinePolicy) -> Self {
        Self { offset, policy }
    }

    pub fn context_at(&self, now: DateTime<Utc>, lang: Lang) -> AggregationContext {
        AggregationContext::new(self.offset, now, lang)
    }

    fn context(&self, lang: Lang) -> AggregationContext {
        self.context_at(Utc::now(), lang)
    }

    pub fn overview(
        &self,
        snapshot: &SalesSnapshot,
        period: TrendPeriod,
        lang: Lang,
    ) -> DashboardOverview {
        aggregator::overview(
            &snapshot.records,
            &snapshot.clients,
            period,
            &self.policy,
            &self.context(lang),
        )
    }

    pub fn monthly(&self, snapshot: &SalesSnapshot, lang: Lang) -> Vec<AggregationBucket> {
        aggregator::by_month(&snapshot.records, &self.context(lang))
    }

    pub fn weekday(&self, snapshot: &SalesSnapshot, lang: Lang) -> Vec<AggregationBucket> {
        aggregator::by_weekday(&snapshot.records, &self.context(lang))
    }

    pub fn hourly(&self, snapshot: &SalesSnapshot, lang: Lang) -> Vec<AggregationBucket> {
        aggregator::hourly_distribution(&snapshot.records, &self.context(lang))
    }

    pub fn advisors(&self, snapshot: &SalesSnapshot, lang: Lang) -> AdvisorBreakdown {
        aggregator::advisor_breakdown(&snapshot.records, lang)
    }

    pub fn heatmap(&self, snapshot: &SalesSnapshot, lang: Lang) -> Vec<HeatmapCell> {
        aggregator::heatmap(&snapshot.records, &self.context(lang))
    }

    pub fn trend(&self, snapshot: &SalesSnapshot, period: TrendPeriod, lang: Lang) -> SalesTrend {
        aggregator::sales_trend(&snapshot.records, period, &self.context(lang))
    }

    pub fn pipeline(&self, snapshot: &SalesSnapshot) -> PipelineEstimate {
        aggregator::pipeline_estimate(&snapshot.records, &self.policy)
    }

    pub fn top_clients(&self, snapshot: &SalesSnapshot, lang: Lang) -> Vec<ClientRankingEntry> {
        aggregator::top_clients(&snapshot.records, &snapshot.clients, &self.context(lang))
    }

    pub fn summary(&self, snapshot: &SalesSnapshot, lang: Lang) -> MetricsSummary {
        aggregator::metrics_summary(&snapshot.records, &self.context(lang))
    }

    /// Série pronta para o renderizador.
    pub fn chart_data(
        &self,
        snapshot: &SalesSnapshot,
        series: ChartSeries,
        period: TrendPeriod,
        lang: Lang,
    ) -> ChartData {
        fn from_buckets(buckets: Vec<AggregationBucket>) -> ChartData {
            let (labels, values) = buckets
                .into_iter()
                .map(|b| (b.label, b.count as f64))
                .unzip();
            ChartData::new(labels, values)
        }

        match series {
            ChartSeries::Monthly => from_buckets(self.monthly(snapshot, lang)),
            ChartSeries::Weekday => from_buckets(self.weekday(snapshot, lang)),
            ChartSeries::Hourly => from_buckets(self.hourly(snapshot, lang)),
            ChartSeries::Advisors => from_buckets(self.advisors(snapshot, lang).pie),
            ChartSeries::Trend => {
                let trend = self.trend(snapshot, period, lang);
                ChartData::new(
                    trend.labels,
                    trend.sales.into_iter().map(|v| v as f64).collect(),
                )
            }
            ChartSeries::Pipeline => {
                let p = self.pipeline(snapshot);
                let labels = ["Prospectos", "Contactados", "Interesados", "Propuestas", "Cerrados"];
                let labels_en = ["Prospects", "Contacted", "Interested", "Proposals", "Closed"];
                let labels = match lang {
                    Lang::Es => labels,
                    Lang::En => labels_en,
                };
                ChartData::new(
                    labels.iter().map(|l| l.to_string()).collect(),
                    [p.prospects, p.contacted, p.interested, p.proposals, p.closed]
                        .into_iter()
                        .map(|v| v as f64)
                        .collect(),
                )
            }
            ChartSeries::TopClients => {
                let (labels, values) = self
                    .top_clients(snapshot, lang)
                    .into_iter()
                    .map(|c| (c.name, c.sales as f64))
                    .unzip();
                ChartData::new(labels, values)
            }
        }
    }
}
