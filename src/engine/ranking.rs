// ==========================================
// IMAC Congelados 生产管理系统 - 最差产品排行
// ==========================================
// 规则:
// 1. 部门内按产品汇总计划/实际（跨窗口内所有月份）
// 2. diferenca = realizado - programado，仅保留 diferenca < 0
// 3. 按 diferenca 升序（最负在前），相等时保持首次出现顺序
// 4. 取前 limit 名；若候选数 > limit 且第 limit 与第 limit+1 名 diferenca 完全相等，
//    只取前 limit-1 名
// 注意: 只检查第 limit/limit+1 名这一处边界，其他名次间的并列不处理
// ==========================================

use std::collections::{BTreeSet, HashMap};

use crate::domain::{
    ProductPerformance, ProductionSpeedRecord, SectorCatalog, SectorFilter, SectorWorstPerformers,
};

/// 默认取前 5 名
pub const DEFAULT_WORST_PERFORMER_LIMIT: usize = 5;

// ==========================================
// PerformanceRankingEngine - 排行引擎
// ==========================================
// 无状态引擎
#[derive(Debug, Clone, Copy)]
pub struct PerformanceRankingEngine {
    limit: usize,
}

impl PerformanceRankingEngine {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_WORST_PERFORMER_LIMIT,
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// 按产品汇总某部门的计划/实际（保持首次出现顺序）
    pub fn aggregate_products<'a, I>(&self, records: I, sector: &str) -> Vec<ProductPerformance>
    where
        I: IntoIterator<Item = &'a ProductionSpeedRecord>,
    {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut products: Vec<ProductPerformance> = Vec::new();

        for record in records.into_iter().filter(|r| r.sector == sector) {
            let i = *index.entry(record.produto.as_str()).or_insert_with(|| {
                products.push(ProductPerformance {
                    name: record.produto.clone(),
                    programado: 0.0,
                    realizado: 0.0,
                    diferenca: 0.0,
                });
                products.len() - 1
            });
            products[i].programado += record.total_programado;
            products[i].realizado += record.total_realizado;
        }

        for p in products.iter_mut() {
            p.diferenca = p.realizado - p.programado;
        }
        products
    }

    /// 对候选产品排序并截断
    pub fn rank(&self, products: Vec<ProductPerformance>) -> Vec<ProductPerformance> {
        let mut candidates: Vec<ProductPerformance> =
            products.into_iter().filter(|p| p.diferenca < 0.0).collect();
        // sort_by 为稳定排序
        candidates.sort_by(|a, b| a.diferenca.total_cmp(&b.diferenca));

        let cut = self.cut_len(&candidates);
        candidates.truncate(cut);
        candidates
    }

    fn cut_len(&self, candidates: &[ProductPerformance]) -> usize {
        let limit = self.limit;
        if candidates.len() > limit && candidates[limit - 1].diferenca == candidates[limit].diferenca
        {
            limit - 1
        } else {
            limit.min(candidates.len())
        }
    }

    /// 某部门的最差产品
    pub fn worst_performers<'a, I>(&self, records: I, sector: &str) -> Vec<ProductPerformance>
    where
        I: IntoIterator<Item = &'a ProductionSpeedRecord>,
    {
        self.rank(self.aggregate_products(records, sector))
    }

    /// 对窗口内出现的每个部门（或筛选指定的部门）计算最差产品
    ///
    /// 部门按目录顺序排列，未登记的部门排在最后（按编码字典序）。
    pub fn worst_performers_by_sector(
        &self,
        records: &[&ProductionSpeedRecord],
        catalog: &SectorCatalog,
        sector_filter: &SectorFilter,
    ) -> Vec<SectorWorstPerformers> {
        let sectors: Vec<String> = match sector_filter {
            SectorFilter::Only(code) => vec![code.clone()],
            SectorFilter::All => {
                let present: BTreeSet<&str> = records.iter().map(|r| r.sector.as_str()).collect();
                let mut sectors: Vec<String> = present.into_iter().map(str::to_string).collect();
                sectors.sort_by_key(|s| catalog.position(s));
                sectors
            }
        };

        sectors
            .into_iter()
            .map(|sector| {
                let entries = self.worst_performers(records.iter().copied(), &sector);
                tracing::debug!(sector = %sector, count = entries.len(), "最差产品排行完成");
                SectorWorstPerformers {
                    sector_label: catalog.label_for(&sector),
                    sector,
                    entries,
                }
            })
            .collect()
    }
}

impl Default for PerformanceRankingEngine {
    fn default() -> Self {
        Self::new()
    }
}
