// ==========================================
// IMAC Congelados 生产管理系统 - 月份键与日期解析
// ==========================================
// 两种日期编码:
// - "MM/YYYY"    月份桶 (生产速度记录 mesAno)
// - "YYYY-MM-DD" 日事件 (生产观察 date)
// 解析宽松: 格式错误返回 None，不报错
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 月份键
///
/// 字段顺序 (year, month) 保证派生的 Ord 即时间顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// 解析 "MM/YYYY"
    pub fn parse(mes_ano: &str) -> Option<Self> {
        let (month, year) = mes_ano.trim().split_once('/')?;
        let month = month.trim().parse::<u32>().ok()?;
        let year = year.trim().parse::<i32>().ok()?;
        Self::new(year, month)
    }

    /// 解析 "YYYY-MM..." 的前 7 个字符
    pub fn from_iso_prefix(value: &str) -> Option<Self> {
        let prefix = value.get(..7)?;
        let (year, month) = prefix.split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// "YYYY-MM"
    pub fn iso(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// "MM/YYYY"
    pub fn label(&self) -> String {
        format!("{:02}/{:04}", self.month, self.year)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).and_then(|d| d.pred_opt())
    }

    /// 当月第 day 天（day 从 1 开始）；超出当月天数返回 None
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 解析 "YYYY-MM-DD"
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// "YYYY-MM" 形式的月份键 -> "MM/YYYY"；无法解析时原样返回
pub fn iso_month_to_label(iso_month: &str) -> String {
    MonthKey::from_iso_prefix(iso_month)
        .map(|k| k.label())
        .unwrap_or_else(|| iso_month.to_string())
}
