// ==========================================
// IMAC Congelados 生产管理系统 - 引擎层
// ==========================================
// 职责: 筛选、分组、KPI、排行、影响率、展示映射、批量登记
// 红线: Engine 不拼 SQL; 空输入与零分母返回零值，不报错
// ==========================================

pub mod bulk_registration;
pub mod filter;
pub mod grouping;
pub mod impact_rate;
pub mod kpi;
pub mod normalization;
pub mod presentation;
pub mod ranking;
pub mod report;

#[cfg(test)]
mod test_support;

// 重导出核心引擎
pub use bulk_registration::{BulkRegistrationEngine, ProductionSpeedWriter};
pub use filter::{
    filter_observations, filter_speed_records, filter_speed_records_overlapping,
    ObservationFilter, RecordFilter,
};
pub use grouping::{
    group_observations_by_month, group_speed_records_by_month, monthly_trend, MonthGroup,
    MonthlyTotals,
};
pub use impact_rate::ImpactRateEngine;
pub use kpi::compute_kpis;
pub use normalization::DateRange;
pub use presentation::{
    DailyPoint, ImpactRow, MonthTableGroup, ProductionTableRow, SectorTotals, TrendPoint,
};
pub use ranking::PerformanceRankingEngine;
pub use report::{ProductionReportBuilder, ProductionSpeedView};
