// 引擎单元测试共用的记录构造函数

use chrono::{Local, NaiveDateTime};

use crate::domain::{
    DailyProduction, ProductionObservationRecord, ProductionSpeedRecord, ProductionTotals,
};

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// 合计值直接给定；第 1 天承载全部计划/实际
pub(crate) fn speed_record(
    id: &str,
    mes_ano: &str,
    sector: &str,
    produto: &str,
    total_programado: f64,
    total_realizado: f64,
) -> ProductionSpeedRecord {
    let mut days = vec![DailyProduction::default(); 31];
    days[0] = DailyProduction::new(total_programado, total_realizado);
    let totals = ProductionTotals::from_days(&days);
    ProductionSpeedRecord {
        id: id.to_string(),
        mes_ano: mes_ano.to_string(),
        sector: sector.to_string(),
        produto: produto.to_string(),
        meta_mes: 0.0,
        daily_production: days,
        total_programado: totals.total_programado,
        total_realizado: totals.total_realizado,
        velocidade: totals.velocidade,
        created_at: now(),
        updated_at: now(),
    }
}

/// 按日条目构造 (day 从 1 开始)，合计值由日条目计算
pub(crate) fn speed_record_with_days(
    id: &str,
    mes_ano: &str,
    sector: &str,
    produto: &str,
    active_days: &[(usize, f64, f64)],
) -> ProductionSpeedRecord {
    let mut days = vec![DailyProduction::default(); 31];
    for (day, programado, realizado) in active_days {
        days[day - 1] = DailyProduction::new(*programado, *realizado);
    }
    let totals = ProductionTotals::from_days(&days);
    ProductionSpeedRecord {
        id: id.to_string(),
        mes_ano: mes_ano.to_string(),
        sector: sector.to_string(),
        produto: produto.to_string(),
        meta_mes: 0.0,
        daily_production: days,
        total_programado: totals.total_programado,
        total_realizado: totals.total_realizado,
        velocidade: totals.velocidade,
        created_at: now(),
        updated_at: now(),
    }
}

pub(crate) fn observation(
    id: &str,
    date: &str,
    sector: &str,
    product: &str,
    observation_type: &str,
    had_impact: bool,
) -> ProductionObservationRecord {
    ProductionObservationRecord {
        id: id.to_string(),
        date: date.to_string(),
        sector: sector.to_string(),
        product: product.to_string(),
        observation_type: observation_type.to_string(),
        description: String::new(),
        had_impact,
        created_at: now(),
        updated_at: now(),
    }
}
