// ==========================================
// IMAC Congelados 生产管理系统 - 报表参数
// ==========================================

use serde::{Deserialize, Serialize};

use crate::engine::grouping::DEFAULT_TREND_WINDOW_MONTHS;
use crate::engine::impact_rate::DEFAULT_IMPACT_WINDOW_MONTHS;
use crate::engine::ranking::DEFAULT_WORST_PERFORMER_LIMIT;

/// 生产速度页面的报表参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSettings {
    pub impact_window_months: usize, // 影响率保留月数
    pub trend_window_months: usize,  // 趋势图保留月数
    pub worst_performer_limit: usize, // 最差产品取前 N 名
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            impact_window_months: DEFAULT_IMPACT_WINDOW_MONTHS,
            trend_window_months: DEFAULT_TREND_WINDOW_MONTHS,
            worst_performer_limit: DEFAULT_WORST_PERFORMER_LIMIT,
        }
    }
}
