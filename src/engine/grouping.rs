// ==========================================
// IMAC Congelados 生产管理系统 - 月度分组
// ==========================================
// 分组键:
// - 生产速度: mesAno 原值
// - 生产观察: date 前 7 个字符 (YYYY-MM)
// 排序: 展示分组按时间倒序；趋势图按时间正序，仅保留最近 N 个月
// ==========================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{velocity_pct, MonthKey, ProductionObservationRecord, ProductionSpeedRecord};

/// 一个月份桶
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup<'a, T> {
    pub key: String,
    pub month: Option<MonthKey>, // 无法解析的键排在最旧
    pub records: Vec<&'a T>,
}

/// 月度合计（趋势图数据源）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    pub month: MonthKey,
    pub meta_mes: f64,
    pub programado: f64,
    pub realizado: f64,
    pub velocidade: f64,
}

fn group_by_key<'a, T, I, F>(records: I, key_of: F, parse: fn(&str) -> Option<MonthKey>) -> Vec<MonthGroup<'a, T>>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> &str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<MonthGroup<'a, T>> = Vec::new();

    for record in records {
        let key = key_of(record);
        match index.get(key) {
            Some(&i) => groups[i].records.push(record),
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(MonthGroup {
                    key: key.to_string(),
                    month: parse(key),
                    records: vec![record],
                });
            }
        }
    }

    // 时间倒序；键空间即分组键，不存在并列
    groups.sort_by(|a, b| b.month.cmp(&a.month).then_with(|| b.key.cmp(&a.key)));
    groups
}

/// 生产速度记录按 mesAno 分组（最近的月份在前）
pub fn group_speed_records_by_month<'a, I>(records: I) -> Vec<MonthGroup<'a, ProductionSpeedRecord>>
where
    I: IntoIterator<Item = &'a ProductionSpeedRecord>,
{
    group_by_key(records, |r| r.mes_ano.as_str(), MonthKey::parse)
}

/// 生产观察按 YYYY-MM 分组（最近的月份在前）
pub fn group_observations_by_month<'a, I>(
    observations: I,
) -> Vec<MonthGroup<'a, ProductionObservationRecord>>
where
    I: IntoIterator<Item = &'a ProductionObservationRecord>,
{
    group_by_key(observations, |o| o.month_prefix(), MonthKey::from_iso_prefix)
}

/// 默认趋势图保留最近 12 个月
pub const DEFAULT_TREND_WINDOW_MONTHS: usize = 12;

/// 月度趋势：按时间正序，保留最近 window 个月（其中最旧的在前）
///
/// mesAno 无法解析的记录不进入趋势图。
pub fn monthly_trend<'a, I>(records: I, window: usize) -> Vec<MonthlyTotals>
where
    I: IntoIterator<Item = &'a ProductionSpeedRecord>,
{
    let mut totals: HashMap<MonthKey, MonthlyTotals> = HashMap::new();

    for record in records {
        let Some(month) = record.month_key() else {
            continue;
        };
        let entry = totals.entry(month).or_insert(MonthlyTotals {
            month,
            meta_mes: 0.0,
            programado: 0.0,
            realizado: 0.0,
            velocidade: 0.0,
        });
        entry.meta_mes += record.meta_mes;
        entry.programado += record.total_programado;
        entry.realizado += record.total_realizado;
    }

    let mut points: Vec<MonthlyTotals> = totals
        .into_values()
        .map(|mut t| {
            t.velocidade = velocity_pct(t.programado, t.realizado);
            t
        })
        .collect();
    points.sort_by_key(|t| t.month);

    let skip = points.len().saturating_sub(window);
    points.into_iter().skip(skip).collect()
}
