// ==========================================
// IMAC Congelados 生产管理系统 - 生产速度领域模型
// ==========================================
// 对齐: production_speed 表
// 红线: totalProgramado/totalRealizado 必须等于 dailyProduction 各字段之和
//       (写入路径负责重算，分析引擎只信任已存储的合计值)
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::month::MonthKey;

/// 每月最多 31 个日槽位
pub const MAX_DAYS_PER_MONTH: usize = 31;

// ==========================================
// DailyProduction - 单日计划/实际
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyProduction {
    pub programado: f64, // 计划量
    pub realizado: f64,  // 实际量
}

impl DailyProduction {
    pub fn new(programado: f64, realizado: f64) -> Self {
        Self {
            programado,
            realizado,
        }
    }

    /// 当天是否有生产活动（计划或实际任一大于 0）
    pub fn is_active(&self) -> bool {
        self.realizado > 0.0 || self.programado > 0.0
    }
}

// ==========================================
// ProductionSpeedRecord - 生产速度记录
// ==========================================
// 唯一性: (mes_ano, sector, produto)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSpeedRecord {
    pub id: String,
    pub mes_ano: String, // "MM/YYYY"
    pub sector: String,  // 部门编码
    pub produto: String,
    pub meta_mes: f64, // 月目标
    pub daily_production: Vec<DailyProduction>, // 下标 = 日 - 1

    // ===== 写入时重算 =====
    pub total_programado: f64,
    pub total_realizado: f64,
    pub velocidade: f64, // 实际/计划 × 100

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ProductionSpeedRecord {
    /// 月份键（mesAno 格式错误时为 None）
    pub fn month_key(&self) -> Option<MonthKey> {
        MonthKey::parse(&self.mes_ano)
    }

    /// realizado > 0 的日条目数
    pub fn days_with_output(&self) -> usize {
        self.daily_production
            .iter()
            .filter(|d| d.realizado > 0.0)
            .count()
    }
}

// ==========================================
// ProductionSpeedInput - 创建/编辑负载
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSpeedInput {
    pub mes_ano: String,
    pub sector: String,
    pub produto: String,
    #[serde(default)]
    pub meta_mes: f64,
    #[serde(default)]
    pub daily_production: Vec<DailyProduction>,
}

impl ProductionSpeedInput {
    /// 零值记录（批量登记用）：31 个日槽位全 0，月目标 0
    pub fn zeroed(mes_ano: &str, sector: &str, produto: &str) -> Self {
        Self {
            mes_ano: mes_ano.to_string(),
            sector: sector.to_string(),
            produto: produto.to_string(),
            meta_mes: 0.0,
            daily_production: vec![DailyProduction::default(); MAX_DAYS_PER_MONTH],
        }
    }

    /// 根据日条目重算合计
    pub fn totals(&self) -> ProductionTotals {
        ProductionTotals::from_days(&self.daily_production)
    }
}

// ==========================================
// ProductionTotals - 合计值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProductionTotals {
    pub total_programado: f64,
    pub total_realizado: f64,
    pub velocidade: f64,
}

impl ProductionTotals {
    pub fn from_days(days: &[DailyProduction]) -> Self {
        let total_programado: f64 = days.iter().map(|d| d.programado).sum();
        let total_realizado: f64 = days.iter().map(|d| d.realizado).sum();
        Self {
            total_programado,
            total_realizado,
            velocidade: velocity_pct(total_programado, total_realizado),
        }
    }
}

/// 速度百分比：计划为 0 时定义为 0
pub fn velocity_pct(programado: f64, realizado: f64) -> f64 {
    if programado > 0.0 {
        realizado / programado * 100.0
    } else {
        0.0
    }
}
