// ==========================================
// IMAC Congelados 生产管理系统 - 记录筛选
// ==========================================
// 职责: 日期区间 + 部门 + 产品关键字 (AND)
// 红线: 纯函数，不修改输入，无隐藏状态
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ProductionObservationRecord, ProductionSpeedRecord, SectorFilter};
use crate::engine::normalization::{
    normalize_query, observation_instant, speed_record_instant, speed_record_span, DateRange,
};

// ==========================================
// RecordFilter - 生产速度筛选条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub sector: SectorFilter,
    pub product_query: Option<String>,
}

impl RecordFilter {
    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_sector(mut self, sector: &str) -> Self {
        self.sector = SectorFilter::parse(sector);
        self
    }

    pub fn with_product(mut self, query: &str) -> Self {
        self.product_query = Some(query.to_string());
        self
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    pub fn matches(&self, record: &ProductionSpeedRecord) -> bool {
        let query = normalize_query(self.product_query.as_deref());
        self.matches_with(record, &self.date_range(), query.as_deref())
    }

    fn matches_with(
        &self,
        record: &ProductionSpeedRecord,
        range: &DateRange,
        query: Option<&str>,
    ) -> bool {
        range.contains(speed_record_instant(record))
            && self.sector.matches(&record.sector)
            && contains_query(&record.produto, query)
    }
}

// ==========================================
// ObservationFilter - 生产观察筛选条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub sector: SectorFilter,
    pub product_query: Option<String>,
    pub observation_type: Option<String>,
    pub had_impact: Option<bool>,
}

impl ObservationFilter {
    /// 与生产速度筛选共用日期/部门/产品条件
    pub fn from_record_filter(filter: &RecordFilter) -> Self {
        Self {
            start: filter.start,
            end: filter.end,
            sector: filter.sector.clone(),
            product_query: filter.product_query.clone(),
            observation_type: None,
            had_impact: None,
        }
    }

    pub fn matches(&self, observation: &ProductionObservationRecord) -> bool {
        let range = DateRange::new(self.start, self.end);
        let query = normalize_query(self.product_query.as_deref());

        range.contains(observation_instant(observation))
            && self.sector.matches(&observation.sector)
            && contains_query(&observation.product, query.as_deref())
            && self
                .observation_type
                .as_deref()
                .map_or(true, |t| t == observation.observation_type)
            && self.had_impact.map_or(true, |h| h == observation.had_impact)
    }
}

fn contains_query(value: &str, query: Option<&str>) -> bool {
    match query {
        Some(q) => value.to_lowercase().contains(q),
        None => true,
    }
}

/// 筛选生产速度记录（保持输入顺序）
pub fn filter_speed_records<'a>(
    records: &'a [ProductionSpeedRecord],
    filter: &RecordFilter,
) -> Vec<&'a ProductionSpeedRecord> {
    let range = filter.date_range();
    let query = normalize_query(filter.product_query.as_deref());
    records
        .iter()
        .filter(|r| filter.matches_with(r, &range, query.as_deref()))
        .collect()
}

/// 筛选当月与日期区间有交集的生产速度记录（保持输入顺序）
///
/// 影响率按产品日统计，区间从月中开始时当月记录仍需参与，逐日裁剪由引擎完成。
pub fn filter_speed_records_overlapping<'a>(
    records: &'a [ProductionSpeedRecord],
    filter: &RecordFilter,
) -> Vec<&'a ProductionSpeedRecord> {
    let range = filter.date_range();
    let query = normalize_query(filter.product_query.as_deref());
    records
        .iter()
        .filter(|r| {
            range.overlaps(speed_record_span(r))
                && filter.sector.matches(&r.sector)
                && contains_query(&r.produto, query.as_deref())
        })
        .collect()
}

/// 筛选生产观察记录（保持输入顺序）
pub fn filter_observations<'a>(
    observations: &'a [ProductionObservationRecord],
    filter: &ObservationFilter,
) -> Vec<&'a ProductionObservationRecord> {
    observations.iter().filter(|o| filter.matches(o)).collect()
}
