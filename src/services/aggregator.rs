// src/services/aggregator.rs

//! Agregações do dashboard de ventas.
//!
//! Funções puras sobre um `&[SaleRecord]`: nada de estado global, nada de
//! cache. Todo o contexto (fuso, "agora", idioma dos rótulos) entra por
//! `AggregationContext`. Um registro com campo ausente ou inválido só fica
//! de fora da agregação que precisava daquele campo.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Utc};

use crate::{
    common::i18n::Lang,
    models::{
        analytics::{
            AdvisorBreakdown, AggregationBucket, ClientRankingEntry, DashboardOverview,
            HeatmapCell, MetricsSummary, PipelineEstimate, PipelinePolicy, RankingEntry,
            SalesTrend, TrendPeriod,
        },
        sales::{ClientId, SaleRecord},
    },
};

pub const DEFAULT_TOP_N: usize = 10;
pub const PIE_DISPLAY_BUDGET: usize = 8;
pub const PIE_KEEP: usize = 7;
pub const HEATMAP_WEEKS: i64 = 4;

#[derive(Debug, Clone, Copy)]
pub struct AggregationContext {
    /// Fuso usado para "hora local", mês e dia do calendário.
    pub offset: FixedOffset,
    pub reference_now: DateTime<FixedOffset>,
    pub lang: Lang,
}

impl AggregationContext {
    pub fn new(offset: FixedOffset, reference_now: DateTime<Utc>, lang: Lang) -> Self {
        Self {
            offset,
            reference_now: reference_now.with_timezone(&offset),
            lang,
        }
    }

    fn today(&self) -> NaiveDate {
        self.reference_now.date_naive()
    }
}

// Registros com data válida, já no fuso do dashboard
fn dated<'a>(
    records: &'a [SaleRecord],
    ctx: &'a AggregationContext,
) -> impl Iterator<Item = (&'a SaleRecord, DateTime<FixedOffset>)> + 'a {
    records
        .iter()
        .filter_map(move |record| record.occurred_at(ctx.offset).map(|at| (record, at)))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, 2)
}

// =========================================================================
//  1. PARTIÇÕES FIXAS (mês, dia da semana, hora)
// =========================================================================

/// 12 buckets, Jan..Dic.
pub fn by_month(records: &[SaleRecord], ctx: &AggregationContext) -> Vec<AggregationBucket> {
    let mut counts = [0u64; 12];
    for (_, at) in dated(records, ctx) {
        counts[at.month0() as usize] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(month0, count)| AggregationBucket::new(ctx.lang.month_short(month0), *count))
        .collect()
}

/// 7 buckets, domingo primeiro.
pub fn by_weekday(records: &[SaleRecord], ctx: &AggregationContext) -> Vec<AggregationBucket> {
    let mut counts = [0u64; 7];
    for (_, at) in dated(records, ctx) {
        counts[at.weekday().num_days_from_sunday() as usize] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(day, count)| AggregationBucket::new(ctx.lang.weekday_short(day), *count))
        .collect()
}

/// 24 buckets pela hora local.
pub fn hourly_distribution(
    records: &[SaleRecord],
    ctx: &AggregationContext,
) -> Vec<AggregationBucket> {
    let mut counts = [0u64; 24];
    for (_, at) in dated(records, ctx) {
        counts[at.hour() as usize] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(hour, count)| AggregationBucket::new(format!("{hour:02}:00"), *count))
        .collect()
}

// =========================================================================
//  2. ASESORES (contagem, ranking, cauda longa)
// =========================================================================

/// Contagem por asesor na ordem em que cada nome apareceu pela primeira vez.
/// Não depende do timestamp.
pub fn by_advisor(records: &[SaleRecord]) -> Vec<AggregationBucket> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<AggregationBucket> = Vec::new();

    for name in records.iter().filter_map(SaleRecord::advisor) {
        match index.get(name) {
            Some(&i) => buckets[i].count += 1,
            None => {
                index.insert(name, buckets.len());
                buckets.push(AggregationBucket::new(name, 1));
            }
        }
    }

    buckets
}

fn sorted_desc(source: &[AggregationBucket]) -> Vec<&AggregationBucket> {
    let mut sorted: Vec<&AggregationBucket> = source.iter().collect();
    // sort_by é estável: empates mantêm a ordem de chegada
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted
}

/// Os `n` maiores, com percentual sobre o total de TODAS as entradas.
pub fn top_n(source: &[AggregationBucket], n: usize) -> Vec<RankingEntry> {
    let total: u64 = source.iter().map(|b| b.count).sum();

    sorted_desc(source)
        .into_iter()
        .take(n)
        .map(|bucket| RankingEntry {
            name: bucket.label.clone(),
            count: bucket.count,
            percentage: percentage(bucket.count, total),
        })
        .collect()
}

/// Mantém a legenda da pizza legível: acima de `display_budget` categorias,
/// fica com as `keep` maiores e dobra o resto em "Otros (<n>)".
/// O total é sempre preservado.
pub fn collapse_long_tail(
    source: &[AggregationBucket],
    display_budget: usize,
    keep: usize,
    lang: Lang,
) -> Vec<AggregationBucket> {
    let sorted = sorted_desc(source);

    if sorted.len() <= display_budget {
        return sorted.into_iter().cloned().collect();
    }

    let keep = keep.min(sorted.len());
    let (kept, folded) = sorted.split_at(keep);

    let mut collapsed: Vec<AggregationBucket> = kept.iter().map(|b| (*b).clone()).collect();
    if !folded.is_empty() {
        let folded_total = folded.iter().map(|b| b.count).sum();
        collapsed.push(AggregationBucket::new(lang.others(folded.len()), folded_total));
    }
    collapsed
}

pub fn advisor_breakdown(records: &[SaleRecord], lang: Lang) -> AdvisorBreakdown {
    let counts = by_advisor(records);
    AdvisorBreakdown {
        ranking: top_n(&counts, DEFAULT_TOP_N),
        pie: collapse_long_tail(&counts, PIE_DISPLAY_BUDGET, PIE_KEEP, lang),
    }
}

// =========================================================================
//  3. CALENDÁRIO (heatmap e tendência)
// =========================================================================

fn daily_counts(
    records: &[SaleRecord],
    ctx: &AggregationContext,
    from: NaiveDate,
    to: NaiveDate,
) -> HashMap<NaiveDate, u64> {
    let mut counts = HashMap::new();
    for (_, at) in dated(records, ctx) {
        let date = at.date_naive();
        if date >= from && date <= to {
            *counts.entry(date).or_insert(0) += 1;
        }
    }
    counts
}

/// Grade 4x7 começando em `agora - 28 dias`. Sempre 28 células; a última é
/// ontem, o dia corrente fica de fora.
pub fn heatmap(records: &[SaleRecord], ctx: &AggregationContext) -> Vec<HeatmapCell> {
    let today = ctx.today();
    let start = today - Duration::days(HEATMAP_WEEKS * 7);
    let counts = daily_counts(records, ctx, start, today - Duration::days(1));

    let mut cells = Vec::with_capacity((HEATMAP_WEEKS * 7) as usize);
    for week in 0..HEATMAP_WEEKS {
        for day in 0..7 {
            let date = start + Duration::days(week * 7 + day);
            cells.push(HeatmapCell {
                day_of_week: day as u8,
                week: week as u8,
                date,
                sales: counts.get(&date).copied().unwrap_or(0),
            });
        }
    }
    cells
}

fn trend_label(date: NaiveDate, period_days: u32, lang: Lang) -> String {
    if period_days <= 7 {
        format!(
            "{} {}",
            lang.weekday_short(date.weekday().num_days_from_sunday() as usize),
            date.day()
        )
    } else if period_days <= 90 {
        format!("{} {}", lang.month_short(date.month0() as usize), date.day())
    } else {
        format!(
            "{} {:02}",
            lang.month_short(date.month0() as usize),
            date.year().rem_euclid(100)
        )
    }
}

/// Um bucket por dia em `[agora - período, agora]`, com acumulado.
pub fn sales_trend(
    records: &[SaleRecord],
    period: TrendPeriod,
    ctx: &AggregationContext,
) -> SalesTrend {
    let days = period.days();
    let today = ctx.today();
    let start = today - Duration::days(i64::from(days));
    let counts = daily_counts(records, ctx, start, today);

    let mut labels = Vec::with_capacity(days as usize + 1);
    let mut sales = Vec::with_capacity(days as usize + 1);
    let mut cumulative = Vec::with_capacity(days as usize + 1);
    let mut running = 0u64;

    for offset in 0..=i64::from(days) {
        let date = start + Duration::days(offset);
        let count = counts.get(&date).copied().unwrap_or(0);
        running += count;

        labels.push(trend_label(date, days, ctx.lang));
        sales.push(count);
        cumulative.push(running);
    }

    SalesTrend {
        period_days: days,
        labels,
        sales,
        cumulative,
    }
}

// =========================================================================
//  4. FUNIL, CLIENTES E CARDS
// =========================================================================

pub fn pipeline_estimate(records: &[SaleRecord], policy: &PipelinePolicy) -> PipelineEstimate {
    let closed = records.len() as u64;
    let scaled = |multiplier: f64| (closed as f64 * multiplier).round() as u64;

    PipelineEstimate {
        prospects: scaled(policy.prospects),
        contacted: scaled(policy.contacted),
        interested: scaled(policy.interested),
        proposals: scaled(policy.proposals),
        closed,
    }
}

#[derive(Default)]
struct ClientTally {
    sales: u64,
    advisor: Option<String>,
    dates: Vec<DateTime<FixedOffset>>,
}

// Média de dias entre vendas consecutivas, datas em ordem crescente
fn mean_gap_days(dates: &mut [DateTime<FixedOffset>]) -> f64 {
    if dates.len() < 2 {
        return 0.0;
    }
    dates.sort();

    let total_seconds: i64 = dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds())
        .sum();
    let gaps = (dates.len() - 1) as f64;

    round_to(total_seconds as f64 / 86_400.0 / gaps, 1)
}

/// Top 10 clientes por número de vendas.
pub fn top_clients(
    records: &[SaleRecord],
    directory: &HashMap<ClientId, String>,
    ctx: &AggregationContext,
) -> Vec<ClientRankingEntry> {
    let mut order: Vec<&ClientId> = Vec::new();
    let mut tallies: HashMap<&ClientId, ClientTally> = HashMap::new();

    for record in records {
        let Some(client_id) = record.client_id.as_ref() else {
            continue;
        };

        let tally = tallies.entry(client_id).or_insert_with(|| {
            order.push(client_id);
            ClientTally::default()
        });

        tally.sales += 1;
        if tally.advisor.is_none() {
            tally.advisor = record.advisor().map(str::to_string);
        }
        if let Some(at) = record.occurred_at(ctx.offset) {
            tally.dates.push(at);
        }
    }

    let total: u64 = tallies.values().map(|t| t.sales).sum();

    let mut ranking: Vec<ClientRankingEntry> = order
        .into_iter()
        .filter_map(|client_id| {
            let mut tally = tallies.remove(client_id)?;
            let name = directory
                .get(client_id)
                .filter(|name| !name.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| ctx.lang.unnamed_client(client_id.as_str()));

            Some(ClientRankingEntry {
                client_id: client_id.to_string(),
                name,
                sales: tally.sales,
                advisor: tally.advisor.take(),
                frequency: mean_gap_days(&mut tally.dates),
                percentage: percentage(tally.sales, total),
            })
        })
        .collect();

    ranking.sort_by(|a, b| b.sales.cmp(&a.sales));
    ranking.truncate(DEFAULT_TOP_N);
    ranking
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 30,
    }
}

/// Mês corrente contra o anterior, média diária e contagens gerais.
pub fn metrics_summary(records: &[SaleRecord], ctx: &AggregationContext) -> MetricsSummary {
    let today = ctx.today();
    let current = (today.year(), today.month());
    let previous = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };

    let mut current_month = 0u64;
    let mut previous_month = 0u64;
    for (_, at) in dated(records, ctx) {
        let key = (at.year(), at.month());
        if key == current {
            current_month += 1;
        } else if key == previous {
            previous_month += 1;
        }
    }

    let trend = if previous_month == 0 {
        0.0
    } else {
        round_to(
            (current_month as f64 - previous_month as f64) / previous_month as f64 * 100.0,
            1,
        )
    };

    let daily_average = round_to(
        current_month as f64 / f64::from(days_in_month(current.0, current.1)),
        2,
    );

    let active_advisors = records
        .iter()
        .filter_map(SaleRecord::advisor)
        .collect::<HashSet<_>>()
        .len() as u64;
    let active_clients = records
        .iter()
        .filter_map(|r| r.client_id.as_ref())
        .collect::<HashSet<_>>()
        .len() as u64;

    MetricsSummary {
        current_month,
        previous_month,
        trend,
        daily_average,
        total_sales: records.len() as u64,
        active_advisors,
        active_clients,
    }
}

pub fn overview(
    records: &[SaleRecord],
    directory: &HashMap<ClientId, String>,
    period: TrendPeriod,
    policy: &PipelinePolicy,
    ctx: &AggregationContext,
) -> DashboardOverview {
    DashboardOverview {
        summary: metrics_summary(records, ctx),
        monthly: by_month(records, ctx),
        weekday: by_weekday(records, ctx),
        hourly: hourly_distribution(records, ctx),
        advisors: advisor_breakdown(records, ctx.lang),
        heatmap: heatmap(records, ctx),
        trend: sales_trend(records, period, ctx),
        pipeline: pipeline_estimate(records, policy),
        top_clients: top_clients(records, directory, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale(ts: &str, advisor: &str) -> SaleRecord {
        SaleRecord {
            timestamp: Some(ts.to_string()),
            advisor_name: Some(advisor.to_string()),
            ..Default::default()
        }
    }

    fn client_sale(ts: &str, advisor: &str, client: &str) -> SaleRecord {
        SaleRecord {
            client_id: Some(ClientId(client.to_string())),
            ..sale(ts, advisor)
        }
    }

    fn ctx_at(y: i32, m: u32, d: u32, h: u32) -> AggregationContext {
        let now = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        AggregationContext::new(FixedOffset::east_opt(0).unwrap(), now, Lang::Es)
    }

    fn sample() -> Vec<SaleRecord> {
        vec![
            sale("2024-07-01T10:00:00Z", "A"),
            sale("2024-07-01T14:00:00Z", "B"),
            sale("2024-08-02T09:00:00Z", "A"),
        ]
    }

    fn total(buckets: &[AggregationBucket]) -> u64 {
        buckets.iter().map(|b| b.count).sum()
    }

    #[test]
    fn monthly_buckets_follow_the_worked_example() {
        let months = by_month(&sample(), &ctx_at(2024, 9, 1, 12));

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].label, "Ene");
        assert_eq!(months[6].count, 2);
        assert_eq!(months[7].count, 1);
        assert_eq!(total(&months), 3);
    }

    #[test]
    fn unparseable_timestamps_only_leave_time_buckets() {
        let mut records = sample();
        records.push(sale("ayer", "C"));
        records.push(SaleRecord {
            advisor_name: Some("C".into()),
            ..Default::default()
        });
        let ctx = ctx_at(2024, 9, 1, 12);

        assert_eq!(total(&by_month(&records, &ctx)), 3);
        assert_eq!(total(&by_weekday(&records, &ctx)), 3);
        assert_eq!(total(&hourly_distribution(&records, &ctx)), 3);

        let advisors = by_advisor(&records);
        assert_eq!(advisors.iter().find(|b| b.label == "C").map(|b| b.count), Some(2));
    }

    #[test]
    fn weekday_and_hour_use_dashboard_offset() {
        // 2024-07-01 é segunda-feira
        let ctx = ctx_at(2024, 9, 1, 12);
        let weekdays = by_weekday(&sample(), &ctx);
        assert_eq!(weekdays[0].label, "Dom");
        assert_eq!(weekdays[1].count, 2);
        assert_eq!(weekdays[5].count, 1);

        let minus_five = AggregationContext {
            offset: FixedOffset::west_opt(5 * 3600).unwrap(),
            ..ctx
        };
        let hours = hourly_distribution(&sample(), &minus_five);
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[5].count, 1);
        assert_eq!(hours[9].count, 1);
        assert_eq!(hours[4].count, 1);
        assert_eq!(hours[5].label, "05:00");
    }

    #[test]
    fn advisor_ranking_matches_worked_example() {
        let counts = by_advisor(&sample());
        assert_eq!(
            counts,
            vec![AggregationBucket::new("A", 2), AggregationBucket::new("B", 1)]
        );

        let ranking = top_n(&counts, 10);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].name, "A");
        assert_eq!(ranking[0].percentage, 66.67);
        assert_eq!(ranking[1].name, "B");
        assert_eq!(ranking[1].percentage, 33.33);
    }

    #[test]
    fn advisor_names_are_not_normalized() {
        let records = vec![
            sale("2024-07-01T10:00:00Z", "Ana"),
            sale("2024-07-01T11:00:00Z", "ana"),
            sale("2024-07-01T12:00:00Z", ""),
        ];
        assert_eq!(by_advisor(&records).len(), 2);
    }

    #[test]
    fn top_n_is_bounded_sorted_and_stable() {
        let source: Vec<AggregationBucket> = (0..15)
            .map(|i| AggregationBucket::new(format!("asesor {i}"), (i % 4) as u64))
            .collect();

        let ranking = top_n(&source, 10);
        assert_eq!(ranking.len(), 10);
        assert!(ranking.windows(2).all(|w| w[0].count >= w[1].count));
        // empates de count 3 mantêm a ordem de chegada
        assert_eq!(ranking[0].name, "asesor 3");
        assert_eq!(ranking[1].name, "asesor 7");
        assert_eq!(ranking[2].name, "asesor 11");

        // percentual contra o total de todas as entradas, não só do top
        let all: u64 = source.iter().map(|b| b.count).sum();
        assert_eq!(ranking[0].percentage, percentage(3, all));
    }

    #[test]
    fn long_tail_folds_into_otros() {
        let counts = [10, 9, 8, 7, 6, 5, 4, 3, 2];
        let source: Vec<AggregationBucket> = counts
            .iter()
            .enumerate()
            .map(|(i, c)| AggregationBucket::new(format!("asesor {i}"), *c))
            .collect();

        let collapsed = collapse_long_tail(&source, 8, 7, Lang::Es);
        assert_eq!(collapsed.len(), 8);
        assert_eq!(
            collapsed.iter().take(7).map(|b| b.count).collect::<Vec<_>>(),
            vec![10, 9, 8, 7, 6, 5, 4]
        );
        assert_eq!(collapsed[7], AggregationBucket::new("Otros (2)", 5));
        assert_eq!(total(&collapsed), total(&source));
    }

    #[test]
    fn short_series_are_not_folded() {
        let source = vec![AggregationBucket::new("A", 1), AggregationBucket::new("B", 4)];
        let collapsed = collapse_long_tail(&source, 8, 7, Lang::Es);
        assert_eq!(collapsed.len(), 2);
        assert_eq!(collapsed[0].label, "B");
        assert!(collapse_long_tail(&[], 8, 7, Lang::Es).is_empty());
    }

    #[test]
    fn heatmap_is_always_a_dense_grid() {
        let ctx = ctx_at(2024, 8, 29, 12);
        let empty = heatmap(&[], &ctx);
        assert_eq!(empty.len(), 28);
        assert!(empty.iter().all(|c| c.sales == 0));

        let cells = heatmap(&sample(), &ctx);
        assert_eq!(cells.len(), 28);
        assert_eq!(cells[0].date, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        assert_eq!((cells[0].week, cells[0].day_of_week), (0, 0));
        assert_eq!((cells[27].week, cells[27].day_of_week), (3, 6));

        let aug_2 = cells
            .iter()
            .find(|c| c.date == NaiveDate::from_ymd_opt(2024, 8, 2).unwrap())
            .unwrap();
        assert_eq!(aug_2.sales, 1);
        assert_eq!(cells.iter().map(|c| c.sales).sum::<u64>(), 1);
    }

    #[test]
    fn heatmap_matches_by_calendar_date_not_time_of_day() {
        // "agora" de manhã, venda no fim do dia 28 dias antes
        let ctx = ctx_at(2024, 8, 29, 1);
        let records = vec![sale("2024-08-01T23:59:00Z", "A")];
        let cells = heatmap(&records, &ctx);
        assert_eq!(cells[0].sales, 1);
    }

    #[test]
    fn heatmap_leaves_today_out() {
        let ctx = ctx_at(2024, 8, 29, 12);
        let records = vec![
            sale("2024-08-29T12:00:00Z", "A"),
            sale("2024-08-29T00:30:00Z", "B"),
            sale("2024-08-28T23:00:00Z", "A"),
        ];
        let cells = heatmap(&records, &ctx);

        let last = &cells[27];
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 8, 28).unwrap());
        assert_eq!(last.sales, 1);
        assert!(cells
            .iter()
            .all(|c| c.date != NaiveDate::from_ymd_opt(2024, 8, 29).unwrap()));
        assert_eq!(cells.iter().map(|c| c.sales).sum::<u64>(), 1);
    }

    #[test]
    fn trend_counts_days_and_accumulates() {
        let ctx = ctx_at(2024, 7, 3, 12);
        let records = vec![
            sale("2024-07-01T10:00:00Z", "A"),
            sale("2024-07-01T14:00:00Z", "B"),
            sale("2024-07-03T09:00:00Z", "A"),
            sale("2024-05-01T09:00:00Z", "A"),
        ];

        let trend = sales_trend(&records, TrendPeriod::Week, &ctx);
        assert_eq!(trend.period_days, 7);
        assert_eq!(trend.sales.len(), 8);
        assert_eq!(trend.labels.len(), 8);
        assert_eq!(trend.labels[0], "Mié 26");
        assert_eq!(trend.labels[7], "Mié 3");
        assert_eq!(trend.sales[5], 2);
        assert_eq!(trend.sales[7], 1);
        assert_eq!(*trend.cumulative.last().unwrap(), 3);
        assert!(trend.cumulative.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn trend_labels_depend_on_period_length() {
        let ctx = AggregationContext {
            lang: Lang::En,
            ..ctx_at(2024, 7, 3, 12)
        };
        let month = sales_trend(&[], TrendPeriod::Month, &ctx);
        assert_eq!(month.labels.last().unwrap(), "Jul 3");
        assert_eq!(month.sales.len(), 31);

        let year = sales_trend(&[], TrendPeriod::Year, &ctx);
        assert_eq!(year.labels.last().unwrap(), "Jul 24");
        assert!(year.cumulative.iter().all(|c| *c == 0));
    }

    #[test]
    fn pipeline_scales_closed_sales() {
        let estimate = pipeline_estimate(&sample(), &PipelinePolicy::default());
        assert_eq!(estimate.closed, 3);
        assert_eq!(estimate.prospects, 15);
        assert_eq!(estimate.contacted, 11); // 10.5 arredonda para cima
        assert_eq!(estimate.interested, 8); // 7.5
        assert_eq!(estimate.proposals, 5); // 4.5

        let empty = pipeline_estimate(&[], &PipelinePolicy::default());
        assert_eq!(empty.closed, 0);
        assert_eq!(empty.prospects, 0);
    }

    #[test]
    fn top_clients_rank_by_sales_with_frequency() {
        let ctx = ctx_at(2024, 9, 1, 12);
        let records = vec![
            client_sale("2024-07-11T10:00:00Z", "", "7"),
            client_sale("2024-07-01T10:00:00Z", "Ana", "7"),
            client_sale("2024-07-05T10:00:00Z", "Luis", "7"),
            client_sale("2024-07-02T10:00:00Z", "Luis", "9"),
            sale("2024-07-02T10:00:00Z", "Luis"),
        ];
        let directory = HashMap::from([(ClientId("7".into()), "Ferretería Sol".to_string())]);

        let ranking = top_clients(&records, &directory, &ctx);
        assert_eq!(ranking.len(), 2);

        let first = &ranking[0];
        assert_eq!(first.client_id, "7");
        assert_eq!(first.name, "Ferretería Sol");
        assert_eq!(first.sales, 3);
        // primeiro asesor não vazio encontrado
        assert_eq!(first.advisor.as_deref(), Some("Ana"));
        // 1->5 (4 dias), 5->11 (6 dias)
        assert_eq!(first.frequency, 5.0);
        assert_eq!(first.percentage, 75.0);

        let second = &ranking[1];
        assert_eq!(second.name, "Cliente 9");
        assert_eq!(second.frequency, 0.0);
    }

    #[test]
    fn summary_compares_calendar_months() {
        let ctx = ctx_at(2024, 8, 15, 12);
        let summary = metrics_summary(&sample(), &ctx);

        assert_eq!(summary.current_month, 1);
        assert_eq!(summary.previous_month, 2);
        assert_eq!(summary.trend, -50.0);
        assert_eq!(summary.daily_average, round_to(1.0 / 31.0, 2));
        assert_eq!(summary.total_sales, 3);
        assert_eq!(summary.active_advisors, 2);
    }

    #[test]
    fn summary_trend_is_zero_without_previous_month() {
        let ctx = ctx_at(2024, 7, 15, 12);
        let summary = metrics_summary(&sample(), &ctx);
        assert_eq!(summary.current_month, 2);
        assert_eq!(summary.previous_month, 0);
        assert_eq!(summary.trend, 0.0);
    }

    #[test]
    fn january_compares_against_previous_december() {
        let ctx = ctx_at(2025, 1, 10, 12);
        let records = vec![
            sale("2024-12-20T10:00:00Z", "A"),
            sale("2025-01-02T10:00:00Z", "A"),
            sale("2025-01-03T10:00:00Z", "A"),
        ];
        let summary = metrics_summary(&records, &ctx);
        assert_eq!(summary.previous_month, 1);
        assert_eq!(summary.trend, 100.0);
    }

    #[test]
    fn february_daily_average_uses_its_own_length() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn empty_input_gives_zero_shapes() {
        let ctx = ctx_at(2024, 9, 1, 12);
        let overview = overview(
            &[],
            &HashMap::new(),
            TrendPeriod::default(),
            &PipelinePolicy::default(),
            &ctx,
        );

        assert_eq!(overview.monthly.len(), 12);
        assert_eq!(overview.weekday.len(), 7);
        assert_eq!(overview.hourly.len(), 24);
        assert_eq!(overview.heatmap.len(), 28);
        assert_eq!(overview.trend.sales.len(), 31);
        assert!(overview.advisors.ranking.is_empty());
        assert!(overview.advisors.pie.is_empty());
        assert!(overview.top_clients.is_empty());
        assert_eq!(overview.pipeline.closed, 0);
        assert_eq!(overview.summary.trend, 0.0);
        assert_eq!(overview.summary.daily_average, 0.0);
    }
}
