// ==========================================
// IMAC Congelados 生产管理系统 - 生产速度 API
// ==========================================
// 职责: 生产速度记录的增删改查、按月批量删除、批量登记
// 约束: 写操作后重新读取全量集合返回（不做增量合并）
// ==========================================

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{BatchDeleteResponse, BulkRegisterResponse, CollectionResponse, Page, PageRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::InputValidator;
use crate::config::ConfigManager;
use crate::domain::{BatchOutcome, MonthKey, ProductionSpeedInput, ProductionSpeedRecord};
use crate::engine::{BulkRegistrationEngine, ProductionSpeedWriter};
use crate::i18n::t_with_args;
use crate::repository::ProductionSpeedRepository;

// ==========================================
// ProductionApi - 生产速度 API
// ==========================================
pub struct ProductionApi {
    speed_repo: Arc<ProductionSpeedRepository>,
    config_manager: Arc<ConfigManager>,
    validator: Arc<InputValidator>,
    bulk_engine: BulkRegistrationEngine,
}

impl ProductionApi {
    /// 创建新的ProductionApi实例
    ///
    /// # 参数
    /// - speed_repo: 生产速度仓储
    /// - config_manager: 配置管理器（产品目录）
    /// - validator: 输入校验器
    pub fn new(
        speed_repo: Arc<ProductionSpeedRepository>,
        config_manager: Arc<ConfigManager>,
        validator: Arc<InputValidator>,
    ) -> Self {
        Self {
            speed_repo,
            config_manager,
            validator,
            bulk_engine: BulkRegistrationEngine::new(),
        }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 全量列表（最近的月份在前）
    pub fn list_records(&self) -> ApiResult<CollectionResponse<ProductionSpeedRecord>> {
        Ok(CollectionResponse::new(self.speed_repo.list_all()?))
    }

    /// 分页列表
    pub fn list_records_page(&self, page: usize, page_size: usize) -> ApiResult<Page<ProductionSpeedRecord>> {
        let req = PageRequest::new(page, page_size);
        let data = self.speed_repo.list_page(req.page_size, req.offset())?;
        Ok(Page {
            data,
            total: self.speed_repo.count()?,
            page: req.page,
            page_size: req.page_size,
        })
    }

    /// 单条查询
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 记录不存在
    pub fn get_record(&self, record_id: &str) -> ApiResult<ProductionSpeedRecord> {
        self.speed_repo
            .find_by_id(record_id)?
            .ok_or_else(|| ApiError::NotFound(format!("ProductionSpeedRecord(id={})不存在", record_id)))
    }

    // ==========================================
    // 写接口
    // ==========================================

    /// 创建记录
    ///
    /// 合计值与速度由日条目重新计算；同一 (月份, 部门, 产品) 重复时返回 Duplicate。
    pub fn create_record(
        &self,
        input: ProductionSpeedInput,
    ) -> ApiResult<CollectionResponse<ProductionSpeedRecord>> {
        let record = self.insert_record(input)?;
        self.refetch(&record.id)
    }

    /// 更新记录（整体覆盖，保留 created_at）
    pub fn update_record(
        &self,
        record_id: &str,
        input: ProductionSpeedInput,
    ) -> ApiResult<CollectionResponse<ProductionSpeedRecord>> {
        let existing = self.get_record(record_id)?;
        self.validator.validate_speed_input(&input)?;

        let record = build_record(record_id.to_string(), input, existing.created_at, now());
        self.speed_repo.update(&record)?;
        tracing::info!(
            record_id = %record.id,
            mes_ano = %record.mes_ano,
            velocidade = record.velocidade,
            "生产速度记录已更新"
        );
        self.refetch(record_id)
    }

    /// 删除记录
    pub fn delete_record(&self, record_id: &str) -> ApiResult<CollectionResponse<ProductionSpeedRecord>> {
        self.speed_repo.delete_by_id(record_id)?;
        tracing::info!(record_id = %record_id, "生产速度记录已删除");
        self.refetch(record_id)
    }

    /// 按月批量删除（逐条删除，单条失败不中断）
    pub fn delete_month_batch(
        &self,
        mes_ano: &str,
    ) -> ApiResult<BatchDeleteResponse<ProductionSpeedRecord>> {
        let month = MonthKey::parse(mes_ano)
            .ok_or_else(|| ApiError::InvalidInput(format!("mesAno 格式应为 MM/YYYY: {}", mes_ano)))?;

        let mut outcome = BatchOutcome::default();
        for record in self.speed_repo.list_by_month(&month.label())? {
            match self.speed_repo.delete_by_id(&record.id) {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    tracing::warn!(record_id = %record.id, error = %e, "按月删除: 单条失败");
                    outcome.record_failure(&record.id, e.to_string());
                }
            }
        }

        tracing::info!(
            mes_ano = %mes_ano,
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "按月批量删除完成"
        );
        let message = t_with_args(
            "batch.delete_summary",
            &[
                ("succeeded", &outcome.succeeded.to_string()),
                ("failed", &outcome.failed.to_string()),
            ],
        );
        Ok(BatchDeleteResponse {
            outcome,
            message,
            data: self.speed_repo.list_all()?,
        })
    }

    /// 批量登记：为选中部门的每个产品创建一条零值记录
    ///
    /// # 参数
    /// - mes_ano: 登记月份（MM/YYYY）
    /// - sectors: 选中的部门编码
    ///
    /// # 返回
    /// - Ok(BulkRegisterResponse): 成功/失败统计 + 重新读取的全量集合
    /// - Err(ApiError::InvalidInput): 月份非法或没有可登记的产品
    pub async fn bulk_register(
        &self,
        mes_ano: &str,
        sectors: &[String],
    ) -> ApiResult<BulkRegisterResponse> {
        let month = MonthKey::parse(mes_ano)
            .ok_or_else(|| ApiError::InvalidInput(format!("mesAno 格式应为 MM/YYYY: {}", mes_ano)))?;
        let catalog = self
            .config_manager
            .get_product_catalog(sectors)
            .map_err(|e| ApiError::InternalError(format!("产品目录读取失败: {}", e)))?;

        let inputs = self.bulk_engine.plan(month, sectors, &catalog);
        if inputs.is_empty() {
            return Err(ApiError::InvalidInput(crate::i18n::t("bulk.no_products")));
        }

        let result = self.bulk_engine.execute(self, inputs).await;
        let message = t_with_args(
            "bulk.summary",
            &[
                ("created", &result.created.to_string()),
                ("errors", &result.errors.to_string()),
            ],
        );
        Ok(BulkRegisterResponse {
            result,
            message,
            data: self.speed_repo.list_all()?,
        })
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 校验 + 入库，返回已持久化的记录
    fn insert_record(&self, input: ProductionSpeedInput) -> ApiResult<ProductionSpeedRecord> {
        self.validator.validate_speed_input(&input)?;

        let ts = now();
        let record = build_record(Uuid::new_v4().to_string(), input, ts, ts);
        self.speed_repo.insert(&record)?;
        tracing::info!(
            record_id = %record.id,
            mes_ano = %record.mes_ano,
            sector = %record.sector,
            produto = %record.produto,
            "生产速度记录已创建"
        );
        Ok(record)
    }

    fn refetch(&self, affected_id: &str) -> ApiResult<CollectionResponse<ProductionSpeedRecord>> {
        Ok(CollectionResponse::with_affected(
            affected_id,
            self.speed_repo.list_all()?,
        ))
    }
}

#[async_trait]
impl ProductionSpeedWriter for ProductionApi {
    async fn create(&self, input: ProductionSpeedInput) -> Result<ProductionSpeedRecord, String> {
        self.insert_record(input).map_err(|e| e.to_string())
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// 由输入构造记录（合计值与速度重新计算）
fn build_record(
    id: String,
    input: ProductionSpeedInput,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
) -> ProductionSpeedRecord {
    let totals = input.totals();
    ProductionSpeedRecord {
        id,
        mes_ano: MonthKey::parse(&input.mes_ano)
            .map(|m| m.label())
            .unwrap_or(input.mes_ano),
        sector: input.sector,
        produto: input.produto.trim().to_string(),
        meta_mes: input.meta_mes,
        daily_production: input.daily_production,
        total_programado: totals.total_programado,
        total_realizado: totals.total_realizado,
        velocidade: totals.velocidade,
        created_at,
        updated_at,
    }
}
