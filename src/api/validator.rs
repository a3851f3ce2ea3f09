// ==========================================
// IMAC Congelados 生产管理系统 - 输入校验器
// ==========================================
// 职责: 写入前的字段级校验，收集全部违规后一次性返回
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::{
    parse_iso_date, MonthKey, ObservationInput, ProductionSpeedInput, SectorCatalog,
    MAX_DAYS_PER_MONTH,
};

// ==========================================
// InputValidator - 输入校验器
// ==========================================

/// 输入校验器
///
/// 规则：
/// 1. mesAno 必须为 MM/YYYY，date 必须为 YYYY-MM-DD
/// 2. 日条目不超过 31 个，数量均为有限非负数
/// 3. 部门/产品/类型不能为空；未登记的部门只告警不拒绝
pub struct InputValidator {
    catalog: Arc<SectorCatalog>,
}

impl InputValidator {
    pub fn new(catalog: Arc<SectorCatalog>) -> Self {
        Self { catalog }
    }

    /// 校验生产速度输入
    pub fn validate_speed_input(&self, input: &ProductionSpeedInput) -> ApiResult<()> {
        let mut violations = Vec::new();

        if MonthKey::parse(&input.mes_ano).is_none() {
            violations.push(ValidationViolation::new(
                "mesAno",
                format!("格式应为 MM/YYYY: {}", input.mes_ano),
            ));
        }
        self.check_sector(&input.sector, &mut violations);
        if input.produto.trim().is_empty() {
            violations.push(ValidationViolation::new("produto", "不能为空"));
        }
        check_quantity("metaMes", input.meta_mes, &mut violations);

        if input.daily_production.len() > MAX_DAYS_PER_MONTH {
            violations.push(ValidationViolation::new(
                "dailyProduction",
                format!(
                    "最多 {} 个日条目，实际 {}",
                    MAX_DAYS_PER_MONTH,
                    input.daily_production.len()
                ),
            ));
        }
        for (i, day) in input.daily_production.iter().enumerate() {
            check_quantity(
                &format!("dailyProduction[{}].programado", i),
                day.programado,
                &mut violations,
            );
            check_quantity(
                &format!("dailyProduction[{}].realizado", i),
                day.realizado,
                &mut violations,
            );
        }

        into_result(violations)
    }

    /// 校验生产观察输入
    pub fn validate_observation_input(&self, input: &ObservationInput) -> ApiResult<()> {
        let mut violations = Vec::new();

        if parse_iso_date(&input.date).is_none() {
            violations.push(ValidationViolation::new(
                "date",
                format!("格式应为 YYYY-MM-DD: {}", input.date),
            ));
        }
        self.check_sector(&input.sector, &mut violations);
        if input.product.trim().is_empty() {
            violations.push(ValidationViolation::new("product", "不能为空"));
        }
        if input.observation_type.trim().is_empty() {
            violations.push(ValidationViolation::new("observationType", "不能为空"));
        }

        into_result(violations)
    }

    fn check_sector(&self, sector: &str, violations: &mut Vec<ValidationViolation>) {
        if sector.trim().is_empty() {
            violations.push(ValidationViolation::new("sector", "不能为空"));
        } else if !self.catalog.is_known(sector) {
            tracing::warn!(sector = %sector, "部门未登记，按原值保存");
        }
    }
}

fn check_quantity(field: &str, value: f64, violations: &mut Vec<ValidationViolation>) {
    if !value.is_finite() || value < 0.0 {
        violations.push(ValidationViolation::new(
            field,
            format!("必须为非负数: {}", value),
        ));
    }
}

fn into_result(violations: Vec<ValidationViolation>) -> ApiResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    Err(ApiError::ValidationFailed {
        reason: format!("{}个字段不合法", violations.len()),
        violations,
    })
}
