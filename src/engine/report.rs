// ==========================================
// IMAC Congelados 生产管理系统 - 生产速度页面组装
// ==========================================
// 职责: 筛选 -> 聚合 -> 展示映射，一次性产出页面视图
// 红线: 纯计算，不访问数据库
// ==========================================

use serde::{Deserialize, Serialize};

use crate::config::ReportSettings;
use crate::domain::{
    KpiSummary, MonthlyImpactEntry, ProductionObservationRecord, ProductionSpeedRecord,
    SectorCatalog, SectorWorstPerformers,
};
use crate::engine::filter::{
    filter_observations, filter_speed_records, filter_speed_records_overlapping,
    ObservationFilter, RecordFilter,
};
use crate::engine::grouping::monthly_trend;
use crate::engine::impact_rate::ImpactRateEngine;
use crate::engine::kpi::compute_kpis;
use crate::engine::presentation::{
    daily_series, impact_rows, month_table_groups, sector_totals, trend_points, DailyPoint,
    ImpactRow, MonthTableGroup, SectorTotals, TrendPoint,
};
use crate::engine::ranking::PerformanceRankingEngine;

/// 生产速度页面视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSpeedView {
    pub filter: RecordFilter,
    pub record_count: usize,
    pub kpis: KpiSummary,
    pub month_groups: Vec<MonthTableGroup>,
    pub trend: Vec<TrendPoint>,
    pub daily: Vec<DailyPoint>,
    pub sector_totals: Vec<SectorTotals>,
    pub worst_performers: Vec<SectorWorstPerformers>,
    pub impact: Vec<MonthlyImpactEntry>,
    pub impact_rows: Vec<ImpactRow>,
}

pub struct ProductionReportBuilder;

impl ProductionReportBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 组装页面视图
    ///
    /// # 参数
    /// - `records` / `observations`: 全量集合（观察记录已排除软删除）
    /// - `filter`: 页面筛选条件，同时作用于两类记录
    ///
    /// 影响率使用与区间有交集的月份记录，并按产品日裁剪到同一区间
    pub fn build(
        &self,
        records: &[ProductionSpeedRecord],
        observations: &[ProductionObservationRecord],
        filter: &RecordFilter,
        settings: &ReportSettings,
        catalog: &SectorCatalog,
    ) -> ProductionSpeedView {
        let selected = filter_speed_records(records, filter);
        let selected_observations =
            filter_observations(observations, &ObservationFilter::from_record_filter(filter));

        let kpis = compute_kpis(selected.iter().copied());
        let trend = monthly_trend(selected.iter().copied(), settings.trend_window_months);
        let ranking = PerformanceRankingEngine::with_limit(settings.worst_performer_limit);
        let impact_records = filter_speed_records_overlapping(records, filter);
        let impact = ImpactRateEngine::with_window(settings.impact_window_months)
            .with_range(filter.date_range())
            .compute(
                impact_records.iter().copied(),
                selected_observations.iter().copied(),
            );

        tracing::debug!(
            records = selected.len(),
            observations = selected_observations.len(),
            "生产速度视图组装完成"
        );

        ProductionSpeedView {
            filter: filter.clone(),
            record_count: selected.len(),
            kpis,
            month_groups: month_table_groups(&selected, catalog),
            trend: trend_points(&trend),
            daily: daily_series(&selected),
            sector_totals: sector_totals(&selected, catalog),
            worst_performers: ranking.worst_performers_by_sector(&selected, catalog, &filter.sector),
            impact_rows: impact_rows(&impact, catalog),
            impact,
        }
    }
}

impl Default for ProductionReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
