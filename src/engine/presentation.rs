// ==========================================
// IMAC Congelados 生产管理系统 - 展示映射
// ==========================================
// 职责: 聚合结果 -> 表格行 / 图表序列
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::{
    iso_month_to_label, velocity_pct, MonthlyImpactEntry, ProductionSpeedRecord, SectorCatalog,
    MAX_DAYS_PER_MONTH,
};
use crate::engine::grouping::{group_speed_records_by_month, MonthlyTotals};

/// 表格行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionTableRow {
    pub id: String,
    pub mes_ano: String,
    pub sector: String,
    pub sector_label: String,
    pub produto: String,
    pub meta_mes: f64,
    pub total_programado: f64,
    pub total_realizado: f64,
    pub diferenca: f64,
    pub velocidade: f64,
}

/// 按月分组的表格（最近的月份在前）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTableGroup {
    pub mes_ano: String,
    pub rows: Vec<ProductionTableRow>,
}

/// 趋势图数据点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String, // "MM/YYYY"
    pub programado: f64,
    pub realizado: f64,
    pub velocidade: f64,
}

/// 日产量图数据点（day 从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub day: u32,
    pub programado: f64,
    pub realizado: f64,
}

/// 部门柱状图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorTotals {
    pub sector: String,
    pub sector_label: String,
    pub programado: f64,
    pub realizado: f64,
    pub velocidade: f64,
}

/// 影响率表格行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRow {
    pub month_label: String,
    pub taxa: f64,
    pub product_days_with_impact: usize,
    pub total_product_days: usize,
    pub sectors: String,
    pub products: String,
    pub top_category: Option<String>,
}

pub fn to_table_row(record: &ProductionSpeedRecord, catalog: &SectorCatalog) -> ProductionTableRow {
    ProductionTableRow {
        id: record.id.clone(),
        mes_ano: record.mes_ano.clone(),
        sector: record.sector.clone(),
        sector_label: catalog.label_for(&record.sector),
        produto: record.produto.clone(),
        meta_mes: record.meta_mes,
        total_programado: record.total_programado,
        total_realizado: record.total_realizado,
        diferenca: record.total_realizado - record.total_programado,
        velocidade: record.velocidade,
    }
}

pub fn month_table_groups(
    records: &[&ProductionSpeedRecord],
    catalog: &SectorCatalog,
) -> Vec<MonthTableGroup> {
    group_speed_records_by_month(records.iter().copied())
        .into_iter()
        .map(|group| MonthTableGroup {
            rows: group
                .records
                .iter()
                .map(|r| to_table_row(r, catalog))
                .collect(),
            mes_ano: group.key,
        })
        .collect()
}

pub fn trend_points(trend: &[MonthlyTotals]) -> Vec<TrendPoint> {
    trend
        .iter()
        .map(|t| TrendPoint {
            label: t.month.label(),
            programado: t.programado,
            realizado: t.realizado,
            velocidade: t.velocidade,
        })
        .collect()
}

/// 按日汇总多条记录的日条目（固定 31 个槽位）
pub fn daily_series(records: &[&ProductionSpeedRecord]) -> Vec<DailyPoint> {
    let mut points: Vec<DailyPoint> = (1..=MAX_DAYS_PER_MONTH as u32)
        .map(|day| DailyPoint {
            day,
            programado: 0.0,
            realizado: 0.0,
        })
        .collect();

    for record in records {
        for (i, entry) in record
            .daily_production
            .iter()
            .take(MAX_DAYS_PER_MONTH)
            .enumerate()
        {
            points[i].programado += entry.programado;
            points[i].realizado += entry.realizado;
        }
    }
    points
}

/// 部门合计（目录顺序）
pub fn sector_totals(
    records: &[&ProductionSpeedRecord],
    catalog: &SectorCatalog,
) -> Vec<SectorTotals> {
    let mut totals: Vec<SectorTotals> = Vec::new();
    for record in records {
        let i = match totals.iter().position(|t| t.sector == record.sector) {
            Some(i) => i,
            None => {
                totals.push(SectorTotals {
                    sector: record.sector.clone(),
                    sector_label: catalog.label_for(&record.sector),
                    programado: 0.0,
                    realizado: 0.0,
                    velocidade: 0.0,
                });
                totals.len() - 1
            }
        };
        totals[i].programado += record.total_programado;
        totals[i].realizado += record.total_realizado;
    }

    for t in totals.iter_mut() {
        t.velocidade = velocity_pct(t.programado, t.realizado);
    }
    totals.sort_by_key(|t| catalog.position(&t.sector));
    totals
}

/// 并列部门/产品以 ", " 连接展示
pub fn impact_rows(entries: &[MonthlyImpactEntry], catalog: &SectorCatalog) -> Vec<ImpactRow> {
    entries
        .iter()
        .map(|e| {
            let sectors = e
                .most_affected_sectors
                .iter()
                .map(|s| catalog.label_for(s))
                .collect::<Vec<_>>()
                .join(", ");
            let products = if e.most_affected_products.is_empty() {
                String::new()
            } else {
                format!(
                    "{} ({})",
                    e.most_affected_products.join(", "),
                    e.product_occurrences
                )
            };
            ImpactRow {
                month_label: iso_month_to_label(&e.month),
                taxa: e.taxa,
                product_days_with_impact: e.product_days_with_impact,
                total_product_days: e.total_product_days,
                sectors,
                products,
                top_category: e.category_breakdown.first().map(|c| c.category.clone()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryImpact;
    use crate::engine::test_support::{speed_record, speed_record_with_days};

    #[test]
    fn test_daily_series_sums_slots() {
        let a = speed_record_with_days("a", "01/2025", "MASSAS", "Nhoque", &[(1, 10.0, 8.0), (31, 5.0, 5.0)]);
        let b = speed_record_with_days("b", "01/2025", "MASSAS", "Lasanha", &[(1, 2.0, 1.0)]);
        let series = daily_series(&[&a, &b]);
        assert_eq!(series.len(), 31);
        assert_eq!(series[0], DailyPoint { day: 1, programado: 12.0, realizado: 9.0 });
        assert_eq!(series[30].day, 31);
        assert_eq!(series[30].realizado, 5.0);
    }

    #[test]
    fn test_sector_totals_in_catalog_order() {
        let a = speed_record("a", "01/2025", "MASSAS", "Nhoque", 100.0, 50.0);
        let b = speed_record("b", "01/2025", "PANIFICACAO", "Baguete", 100.0, 100.0);
        let c = speed_record("c", "02/2025", "MASSAS", "Nhoque", 100.0, 100.0);
        let catalog = SectorCatalog::builtin();
        let totals = sector_totals(&[&a, &b, &c], &catalog);
        assert_eq!(totals[0].sector, "PANIFICACAO");
        assert_eq!(totals[1].sector_label, "Massas");
        assert_eq!(totals[1].velocidade, 75.0);
    }

    #[test]
    fn test_month_groups_use_labels() {
        let a = speed_record("a", "01/2025", "PAO_DE_QUEIJO", "Tradicional", 10.0, 12.0);
        let b = speed_record("b", "02/2025", "PAO_DE_QUEIJO", "Coquetel", 10.0, 8.0);
        let groups = month_table_groups(&[&a, &b], &SectorCatalog::builtin());
        assert_eq!(groups[0].mes_ano, "02/2025");
        assert_eq!(groups[0].rows[0].sector_label, "Pão de Queijo");
        assert_eq!(groups[1].rows[0].diferenca, 2.0);
    }

    #[test]
    fn test_impact_rows_join_ties() {
        let entry = MonthlyImpactEntry {
            month: "2025-03".to_string(),
            taxa: 12.5,
            product_days_with_impact: 1,
            total_product_days: 8,
            most_affected_sectors: vec!["SALGADOS".to_string(), "MASSAS".to_string()],
            sector_occurrences: 2,
            most_affected_products: vec!["Coxinha".to_string(), "Nhoque".to_string()],
            product_occurrences: 1,
            category_breakdown: vec![CategoryImpact {
                category: "Máquina".to_string(),
                count: 2,
                percentage: 100.0,
            }],
        };
        let rows = impact_rows(&[entry], &SectorCatalog::builtin());
        assert_eq!(rows[0].month_label, "03/2025");
        assert_eq!(rows[0].sectors, "Salgados, Massas");
        assert_eq!(rows[0].products, "Coxinha, Nhoque (1)");
        assert_eq!(rows[0].top_category.as_deref(), Some("Máquina"));
    }
}
