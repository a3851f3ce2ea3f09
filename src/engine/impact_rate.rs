// ==========================================
// IMAC Congelados 生产管理系统 - 月度影响率引擎
// ==========================================
// 产品日 (product-day): "product|YYYY-MM-DD"
// 每个月份（出现在任一记录集中）构建两个集合:
// - totalProductDays: 生产速度记录中 realizado > 0 或 programado > 0 的产品日
//                     ∪ 有影响的观察对应的产品日（即使没有对应生产记录）
// - productDaysWithImpact: 至少一条 hadImpact = true 观察的产品日
// taxa = |影响| / |总数| × 100，保留 2 位小数；分母为 0 时为 0
// 日期区间: 只统计落在区间内的产品日；超出当月天数的槽位不是产品日
// 输出: 最近 window 个月，时间正序
// ==========================================

use std::collections::{HashMap, HashSet};

use crate::domain::{
    product_day_key, round2, CategoryImpact, MonthKey, MonthlyImpactEntry,
    ProductionObservationRecord, ProductionSpeedRecord,
};
use crate::engine::normalization::{start_of_day, DateRange};

/// 默认保留最近 12 个月
pub const DEFAULT_IMPACT_WINDOW_MONTHS: usize = 12;

// ==========================================
// Tally - 保持首次出现顺序的计数器
// ==========================================
#[derive(Debug, Default)]
struct Tally {
    index: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl Tally {
    fn bump(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), 1));
            }
        }
    }

    /// 并列最多的键及其共同次数；无计数时为 (空, 0)
    fn leaders(&self) -> (Vec<String>, usize) {
        let max = self.counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
        if max == 0 {
            return (Vec::new(), 0);
        }
        let keys = self
            .counts
            .iter()
            .filter(|(_, c)| *c == max)
            .map(|(k, _)| k.clone())
            .collect();
        (keys, max)
    }

    /// 按次数降序（稳定）
    fn ranked(&self) -> Vec<(String, usize)> {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

#[derive(Debug, Default)]
struct MonthAccumulator {
    total_product_days: HashSet<String>,
    impacted_product_days: HashSet<String>,
    sectors: Tally,
    products: Tally,
    categories: Tally,
    impacts: usize,
}

impl MonthAccumulator {
    fn into_entry(self, month: String) -> MonthlyImpactEntry {
        let total = self.total_product_days.len();
        let impacted = self.impacted_product_days.len();
        let taxa = if total > 0 {
            round2(impacted as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        let (most_affected_sectors, sector_occurrences) = self.sectors.leaders();
        let (most_affected_products, product_occurrences) = self.products.leaders();
        let impacts = self.impacts;
        let category_breakdown = self
            .categories
            .ranked()
            .into_iter()
            .map(|(category, count)| CategoryImpact {
                category,
                count,
                percentage: if impacts > 0 {
                    round2(count as f64 / impacts as f64 * 100.0)
                } else {
                    0.0
                },
            })
            .collect();

        MonthlyImpactEntry {
            month,
            taxa,
            product_days_with_impact: impacted,
            total_product_days: total,
            most_affected_sectors,
            sector_occurrences,
            most_affected_products,
            product_occurrences,
            category_breakdown,
        }
    }
}

// ==========================================
// ImpactRateEngine
// ==========================================
// 无状态引擎，所有方法都是纯函数
#[derive(Debug, Clone, Copy)]
pub struct ImpactRateEngine {
    window: usize,
    range: DateRange,
}

impl ImpactRateEngine {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_IMPACT_WINDOW_MONTHS)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            window,
            range: DateRange::default(),
        }
    }

    /// 限定生产产品日的日期区间（观察记录由调用方按同一区间筛选）
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    /// 计算月度影响率
    ///
    /// # 参数
    /// - `records`: 生产速度记录（当月与区间有交集即可，逐日按区间裁剪）
    /// - `observations`: 生产观察（已筛选，不含已删除）
    ///
    /// # 返回
    /// 最近 window 个月的影响率条目，时间正序
    pub fn compute<'a, 'b, R, O>(&self, records: R, observations: O) -> Vec<MonthlyImpactEntry>
    where
        R: IntoIterator<Item = &'a ProductionSpeedRecord>,
        O: IntoIterator<Item = &'b ProductionObservationRecord>,
    {
        let mut months: HashMap<String, MonthAccumulator> = HashMap::new();

        // 1. 生产速度记录 -> 有活动的产品日
        for record in records {
            let Some(month) = record.month_key() else {
                tracing::debug!(mes_ano = %record.mes_ano, "mesAno 无法解析，跳过影响率统计");
                continue;
            };
            let acc = months.entry(month.iso()).or_default();
            for (i, day) in record.daily_production.iter().enumerate() {
                if !day.is_active() {
                    continue;
                }
                let Some(date) = month.day(i as u32 + 1) else {
                    continue;
                };
                if !self.range.contains(Some(start_of_day(date))) {
                    continue;
                }
                let date = date.format("%Y-%m-%d").to_string();
                acc.total_product_days
                    .insert(product_day_key(&record.produto, &date));
            }
        }

        // 2. 观察记录 -> 有影响的产品日（同时计入分母）
        for observation in observations {
            let acc = months
                .entry(observation.month_prefix().to_string())
                .or_default();
            if !observation.had_impact {
                continue;
            }
            let key = observation.product_day_key();
            acc.impacted_product_days.insert(key.clone());
            acc.total_product_days.insert(key);
            acc.sectors.bump(&observation.sector);
            acc.products.bump(&observation.product);
            acc.categories.bump(&observation.observation_type);
            acc.impacts += 1;
        }

        // 3. 按时间排序，保留最近 window 个月
        let mut ordered: Vec<(String, MonthAccumulator)> = months.into_iter().collect();
        ordered.sort_by(|(a, _), (b, _)| {
            MonthKey::from_iso_prefix(a)
                .cmp(&MonthKey::from_iso_prefix(b))
                .then_with(|| a.cmp(b))
        });
        let skip = ordered.len().saturating_sub(self.window);

        let entries: Vec<MonthlyImpactEntry> = ordered
            .into_iter()
            .skip(skip)
            .map(|(month, acc)| acc.into_entry(month))
            .collect();

        tracing::debug!(months = entries.len(), "月度影响率计算完成");
        entries
    }
}

impl Default for ImpactRateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{observation, speed_record_with_days};

    #[test]
    fn test_rate_three_of_ten() {
        // 10 个产品日，其中 3 个有影响
        let record = speed_record_with_days(
            "r1",
            "03/2025",
            "SALGADOS",
            "Coxinha",
            &(1..=10usize).map(|d| (d, 100.0, 90.0)).collect::<Vec<_>>(),
        );
        let observations = vec![
            observation("o1", "2025-03-01", "SALGADOS", "Coxinha", "Máquina", true),
            observation("o2", "2025-03-02", "SALGADOS", "Coxinha", "Máquina", true),
            observation("o3", "2025-03-03", "SALGADOS", "Coxinha", "Insumo", true),
            // 同一产品日的第二条观察不重复计数
            observation("o4", "2025-03-03", "SALGADOS", "Coxinha", "Insumo", true),
        ];
        let entries = ImpactRateEngine::new().compute(std::iter::once(&record), &observations);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.month, "2025-03");
        assert_eq!(entry.total_product_days, 10);
        assert_eq!(entry.product_days_with_impact, 3);
        assert_eq!(entry.taxa, 30.0);
    }

    #[test]
    fn test_zero_denominator_month_is_zero() {
        // 只有零值记录和无影响观察的月份
        let record = speed_record_with_days("r1", "04/2025", "SALGADOS", "Coxinha", &[]);
        let observations = vec![observation(
            "o1", "2025-05-10", "SALGADOS", "Coxinha", "Nota", false,
        )];
        let entries = ImpactRateEngine::new().compute(std::iter::once(&record), &observations);
        assert_eq!(entries.len(), 2);
        for entry in &entries {
            assert_eq!(entry.total_product_days, 0);
            assert_eq!(entry.taxa, 0.0);
            assert!(entry.most_affected_sectors.is_empty());
            assert!(entry.category_breakdown.is_empty());
        }
    }

    #[test]
    fn test_observation_without_production_counts_in_denominator() {
        let observations = vec![observation(
            "o1", "2025-06-02", "MASSAS", "Nhoque", "Máquina", true,
        )];
        let records: Vec<ProductionSpeedRecord> = Vec::new();
        let entries = ImpactRateEngine::new().compute(&records, &observations);
        assert_eq!(entries[0].total_product_days, 1);
        assert_eq!(entries[0].product_days_with_impact, 1);
        assert_eq!(entries[0].taxa, 100.0);
    }

    #[test]
    fn test_tied_sectors_all_reported() {
        let observations = vec![
            observation("o1", "2025-03-01", "SALGADOS", "Coxinha", "Máquina", true),
            observation("o2", "2025-03-02", "MASSAS", "Nhoque", "Máquina", true),
            observation("o3", "2025-03-03", "SALGADOS", "Kibe", "Insumo", true),
            observation("o4", "2025-03-04", "MASSAS", "Lasanha", "Insumo", true),
            observation("o5", "2025-03-05", "EMBALAGEM", "Caixa", "Insumo", false),
        ];
        let records: Vec<ProductionSpeedRecord> = Vec::new();
        let entries = ImpactRateEngine::new().compute(&records, &observations);
        let entry = &entries[0];
        assert_eq!(entry.most_affected_sectors, vec!["SALGADOS", "MASSAS"]);
        assert_eq!(entry.sector_occurrences, 2);
        assert_eq!(entry.most_affected_products.len(), 4);
        assert_eq!(entry.product_occurrences, 1);
    }

    #[test]
    fn test_category_breakdown_sorted_with_percentages() {
        let observations = vec![
            observation("o1", "2025-03-01", "SALGADOS", "Coxinha", "Máquina", true),
            observation("o2", "2025-03-02", "SALGADOS", "Coxinha", "Insumo", true),
            observation("o3", "2025-03-03", "SALGADOS", "Coxinha", "Insumo", true),
        ];
        let records: Vec<ProductionSpeedRecord> = Vec::new();
        let entries = ImpactRateEngine::new().compute(&records, &observations);
        let breakdown = &entries[0].category_breakdown;
        assert_eq!(breakdown[0].category, "Insumo");
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[0].percentage, 66.67);
        assert_eq!(breakdown[1].category, "Máquina");
        assert_eq!(breakdown[1].percentage, 33.33);
        assert_eq!(entries[0].most_affected_products, vec!["Coxinha"]);
        assert_eq!(entries[0].product_occurrences, 3);
    }

    #[test]
    fn test_window_keeps_most_recent_months_ascending() {
        let observations: Vec<ProductionObservationRecord> = (1..=12)
            .flat_map(|m| {
                vec![
                    observation(&format!("a{}", m), &format!("2024-{:02}-10", m), "S", "P", "T", true),
                    observation(&format!("b{}", m), &format!("2025-{:02}-10", m), "S", "P", "T", true),
                ]
            })
            .collect();
        let records: Vec<ProductionSpeedRecord> = Vec::new();
        let entries = ImpactRateEngine::new().compute(&records, &observations);
        assert_eq!(entries.len(), 12);
        assert_eq!(entries[0].month, "2025-01");
        assert_eq!(entries[11].month, "2025-12");
    }

    #[test]
    fn test_slots_past_month_end_are_not_product_days() {
        // 2 月只有 28 天，29-31 号槽位的数值不计入分母
        let record = speed_record_with_days(
            "r1",
            "02/2025",
            "SALGADOS",
            "Coxinha",
            &[(28, 100.0, 90.0), (29, 100.0, 90.0), (30, 100.0, 90.0), (31, 100.0, 90.0)],
        );
        let observations = vec![observation(
            "o1", "2025-02-28", "SALGADOS", "Coxinha", "Máquina", true,
        )];
        let entries = ImpactRateEngine::new().compute(std::iter::once(&record), &observations);
        assert_eq!(entries[0].total_product_days, 1);
        assert_eq!(entries[0].taxa, 100.0);
    }

    #[test]
    fn test_range_trims_product_days() {
        let record = speed_record_with_days(
            "r1",
            "03/2025",
            "SALGADOS",
            "Coxinha",
            &(1..=31usize).map(|d| (d, 100.0, 90.0)).collect::<Vec<_>>(),
        );
        let observations = vec![observation(
            "o1", "2025-03-15", "SALGADOS", "Coxinha", "Máquina", true,
        )];
        let range = DateRange::new(
            chrono::NaiveDate::from_ymd_opt(2025, 3, 10),
            chrono::NaiveDate::from_ymd_opt(2025, 3, 31),
        );
        let entries = ImpactRateEngine::new()
            .with_range(range)
            .compute(std::iter::once(&record), &observations);
        // 10-31 号共 22 个产品日
        assert_eq!(entries[0].total_product_days, 22);
        assert_eq!(entries[0].product_days_with_impact, 1);
        assert_eq!(entries[0].taxa, 4.55);
    }

    #[test]
    fn test_production_and_impact_on_same_day_counted_once() {
        let record = speed_record_with_days(
            "r1",
            "03/2025",
            "SALGADOS",
            "Coxinha",
            &[(1, 0.0, 50.0), (2, 80.0, 0.0)],
        );
        let observations = vec![observation(
            "o1", "2025-03-02", "SALGADOS", "Coxinha", "Máquina", true,
        )];
        let entries = ImpactRateEngine::new().compute(std::iter::once(&record), &observations);
        assert_eq!(entries[0].total_product_days, 2);
        assert_eq!(entries[0].taxa, 50.0);
    }
}
