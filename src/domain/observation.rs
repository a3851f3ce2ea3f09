// ==========================================
// IMAC Congelados 生产管理系统 - 生产观察领域模型
// ==========================================
// 对齐: production_observation 表 (软删除)
// 用途: 记录生产事件；hadImpact 表示事件是否影响产出
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::month::parse_iso_date;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionObservationRecord {
    pub id: String,
    pub date: String, // "YYYY-MM-DD"
    pub sector: String,
    pub product: String,
    pub observation_type: String, // 自由文本分类
    pub description: String,
    pub had_impact: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ProductionObservationRecord {
    pub fn date_value(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date)
    }

    /// 月份分组键：date 的前 7 个字符 (YYYY-MM)
    pub fn month_prefix(&self) -> &str {
        self.date.get(..7).unwrap_or(self.date.as_str())
    }

    /// 产品日键 "product|YYYY-MM-DD"
    pub fn product_day_key(&self) -> String {
        product_day_key(&self.product, &self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationInput {
    pub date: String,
    pub sector: String,
    pub product: String,
    pub observation_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub had_impact: bool,
}

/// 产品日复合键
pub fn product_day_key(product: &str, iso_date: &str) -> String {
    format!("{}|{}", product, iso_date)
}
