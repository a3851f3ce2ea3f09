// ==========================================
// IMAC Congelados 生产管理系统 - KPI 汇总
// ==========================================
// 输入: 筛选后的生产速度记录
// 规则:
// - 合计值取自已存储的 totalProgramado/totalRealizado（不按日重算）
// - diferenca = realizado - programado
// - velocidade = programado > 0 ? realizado/programado×100 : 0
// - mediaDiaria = realizado / (realizado > 0 的日条目数)，无此类条目时为 0
// ==========================================

use crate::domain::{velocity_pct, KpiSummary, ProductionSpeedRecord};

/// 计算筛选窗口内的 KPI；空窗口返回全 0
pub fn compute_kpis<'a, I>(records: I) -> KpiSummary
where
    I: IntoIterator<Item = &'a ProductionSpeedRecord>,
{
    let mut meta_mes = 0.0;
    let mut programado = 0.0;
    let mut realizado = 0.0;
    let mut days_with_output = 0usize;

    for record in records {
        meta_mes += record.meta_mes;
        programado += record.total_programado;
        realizado += record.total_realizado;
        days_with_output += record.days_with_output();
    }

    let media_diaria = if days_with_output > 0 {
        realizado / days_with_output as f64
    } else {
        0.0
    };

    let summary = KpiSummary {
        meta_mes,
        programado,
        realizado,
        diferenca: realizado - programado,
        media_diaria,
        velocidade: velocity_pct(programado, realizado),
    };
    tracing::debug!(?summary, "KPI 汇总完成");
    summary
}
