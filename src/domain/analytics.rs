// ==========================================
// IMAC Congelados 生产管理系统 - 派生分析实体
// ==========================================
// 不落库：由引擎层基于内存中的记录计算
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// KpiSummary - 筛选窗口内的 KPI 汇总
// ==========================================
// 符号约定: diferenca = realizado - programado (正=超产, 负=欠产)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub meta_mes: f64,
    pub programado: f64,
    pub realizado: f64,
    pub diferenca: f64,
    pub media_diaria: f64,
    pub velocidade: f64,
}

// ==========================================
// ProductPerformance - 单部门内的产品表现
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformance {
    pub name: String,
    pub programado: f64,
    pub realizado: f64,
    pub diferenca: f64,
}

/// 某部门的最差产品排行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorWorstPerformers {
    pub sector: String,
    pub sector_label: String,
    pub entries: Vec<ProductPerformance>,
}

// ==========================================
// MonthlyImpactEntry - 月度影响率
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyImpactEntry {
    pub month: String, // "YYYY-MM"
    pub taxa: f64,     // 百分比，保留 2 位小数
    pub product_days_with_impact: usize,
    pub total_product_days: usize,
    pub most_affected_sectors: Vec<String>, // 并列最多的部门
    pub sector_occurrences: usize,
    pub most_affected_products: Vec<String>, // 并列最多的产品
    pub product_occurrences: usize,
    pub category_breakdown: Vec<CategoryImpact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryImpact {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
}

// ==========================================
// 批量操作结果
// ==========================================

/// 批量登记结果（非事务：成功部分保留）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRegistrationResult {
    pub requested: usize,
    pub created: usize,
    pub errors: usize,
    pub failures: Vec<BulkFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub sector: String,
    pub produto: String,
    pub reason: String,
}

/// 批量删除结果（按月/按日）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub id: String,
    pub reason: String,
}

impl BatchOutcome {
    pub fn record_success(&mut self) {
        self.requested += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, id: &str, reason: String) {
        self.requested += 1;
        self.failed += 1;
        self.failures.push(BatchFailure {
            id: id.to_string(),
            reason,
        });
    }
}

/// 保留 2 位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
