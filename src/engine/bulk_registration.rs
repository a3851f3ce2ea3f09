// ==========================================
// IMAC Congelados 生产管理系统 - 批量登记引擎
// ==========================================
// 职责: 为选中部门的每个产品生成零值记录，并逐条写入
// 规则: 顺序写入、单条失败不中断、不回滚已成功部分
// ==========================================

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::{
    BulkFailure, BulkRegistrationResult, MonthKey, ProductionSpeedInput, ProductionSpeedRecord,
};

// ==========================================
// ProductionSpeedWriter Trait
// ==========================================
// 用途: 批量登记的写入端
// 实现者: ProductionApi（校验 + 入库）
#[async_trait]
pub trait ProductionSpeedWriter: Send + Sync {
    /// 创建一条生产速度记录
    ///
    /// # 返回
    /// - Ok: 已持久化的记录
    /// - Err: 面向用户的失败原因
    async fn create(&self, input: ProductionSpeedInput) -> Result<ProductionSpeedRecord, String>;
}

// ==========================================
// BulkRegistrationEngine
// ==========================================
pub struct BulkRegistrationEngine;

impl BulkRegistrationEngine {
    pub fn new() -> Self {
        Self
    }

    /// 生成待登记的零值输入
    ///
    /// # 参数
    /// - `month`: 登记月份
    /// - `sectors`: 选中的部门（按选择顺序）
    /// - `catalog`: 部门 -> 产品列表
    ///
    /// 目录中没有的部门不产生任何输入。
    pub fn plan(
        &self,
        month: MonthKey,
        sectors: &[String],
        catalog: &BTreeMap<String, Vec<String>>,
    ) -> Vec<ProductionSpeedInput> {
        let mes_ano = month.label();
        let mut inputs = Vec::new();
        for sector in sectors {
            let Some(products) = catalog.get(sector) else {
                tracing::warn!(sector = %sector, "部门无产品目录，跳过");
                continue;
            };
            for produto in products {
                inputs.push(ProductionSpeedInput::zeroed(&mes_ano, sector, produto));
            }
        }
        inputs
    }

    /// 顺序执行写入，逐条统计成功/失败
    pub async fn execute<W>(&self, writer: &W, inputs: Vec<ProductionSpeedInput>) -> BulkRegistrationResult
    where
        W: ProductionSpeedWriter + ?Sized,
    {
        let mut result = BulkRegistrationResult {
            requested: inputs.len(),
            ..Default::default()
        };

        for input in inputs {
            let sector = input.sector.clone();
            let produto = input.produto.clone();
            match writer.create(input).await {
                Ok(record) => {
                    tracing::debug!(record_id = %record.id, sector = %sector, produto = %produto, "批量登记: 已创建");
                    result.created += 1;
                }
                Err(reason) => {
                    tracing::warn!(sector = %sector, produto = %produto, reason = %reason, "批量登记: 创建失败");
                    result.errors += 1;
                    result.failures.push(BulkFailure {
                        sector,
                        produto,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            requested = result.requested,
            created = result.created,
            errors = result.errors,
            "批量登记完成"
        );
        result
    }
}

impl Default for BulkRegistrationEngine {
    fn default() -> Self {
        Self::new()
    }
}
