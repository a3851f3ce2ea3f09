// ==========================================
// IMAC Congelados 生产管理系统 - 归一化
// ==========================================
// 职责: 记录 -> 可比较时间点；筛选边界 -> 闭区间
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::{ProductionObservationRecord, ProductionSpeedRecord};

/// 生产速度记录的时间点：mesAno 当月 1 日 00:00
pub fn speed_record_instant(record: &ProductionSpeedRecord) -> Option<NaiveDateTime> {
    record
        .month_key()
        .and_then(|k| k.first_day())
        .map(start_of_day)
}

/// 观察记录的时间点：date 当日 00:00
pub fn observation_instant(observation: &ProductionObservationRecord) -> Option<NaiveDateTime> {
    observation.date_value().map(start_of_day)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 结束日的 23:59:59.999，使结束日整天包含在区间内
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last_ms)
}

// ==========================================
// DateRange - 闭区间
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start: start.map(start_of_day),
            end: end.map(end_of_day),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// 时间点不可解析时：有边界则排除，无边界则保留
    pub fn contains(&self, instant: Option<NaiveDateTime>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(t) = instant else {
            return false;
        };
        self.start.map_or(true, |s| t >= s) && self.end.map_or(true, |e| t <= e)
    }

    /// [first, last] 日期段与区间是否有交集；日期段不可解析时同 contains
    pub fn overlaps(&self, span: Option<(NaiveDate, NaiveDate)>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some((first, last)) = span else {
            return false;
        };
        self.start.map_or(true, |s| end_of_day(last) >= s)
            && self.end.map_or(true, |e| start_of_day(first) <= e)
    }
}

/// 生产速度记录覆盖的日期段：mesAno 当月 1 日至月末
pub fn speed_record_span(record: &ProductionSpeedRecord) -> Option<(NaiveDate, NaiveDate)> {
    let month = record.month_key()?;
    Some((month.first_day()?, month.last_day()?))
}

/// 产品关键字：去首尾空白、小写；空串视为不过滤
pub fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_end_boundary_inclusive() {
        let range = DateRange::new(Some(d(2025, 1, 1)), Some(d(2025, 1, 31)));
        assert!(range.contains(Some(start_of_day(d(2025, 1, 31)))));
        assert!(!range.contains(Some(start_of_day(d(2025, 2, 1)))));
        assert!(range.contains(Some(start_of_day(d(2025, 1, 1)))));
    }

    #[test]
    fn test_unparseable_instant() {
        assert!(DateRange::default().contains(None));
        assert!(!DateRange::new(Some(d(2025, 1, 1)), None).contains(None));
    }

    #[test]
    fn test_month_span_overlaps_mid_month_range() {
        let range = DateRange::new(Some(d(2025, 3, 10)), Some(d(2025, 3, 31)));
        let march = Some((d(2025, 3, 1), d(2025, 3, 31)));
        let february = Some((d(2025, 2, 1), d(2025, 2, 28)));
        assert!(range.overlaps(march));
        assert!(!range.overlaps(february));
        assert!(!range.overlaps(None));
        assert!(DateRange::default().overlaps(None));
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query(Some("  PÃO ")), Some("pão".to_string()));
        assert_eq!(normalize_query(Some("   ")), None);
        assert_eq!(normalize_query(None), None);
    }
}
