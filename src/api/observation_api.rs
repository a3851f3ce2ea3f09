// ==========================================
// IMAC Congelados 生产管理系统 - 生产观察 API
// ==========================================
// 职责: 生产观察（停机、质量、物料等事件）的增删改查
// 约束: 删除为软删除；写操作后重新读取全量集合返回
// ==========================================

use chrono::NaiveDateTime;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::dto::{BatchDeleteResponse, CollectionResponse, Page, PageRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::InputValidator;
use crate::domain::{parse_iso_date, BatchOutcome, ObservationInput, ProductionObservationRecord};
use crate::i18n::t_with_args;
use crate::repository::ObservationRepository;

pub struct ObservationApi {
    observation_repo: Arc<ObservationRepository>,
    validator: Arc<InputValidator>,
}

impl ObservationApi {
    pub fn new(observation_repo: Arc<ObservationRepository>, validator: Arc<InputValidator>) -> Self {
        Self {
            observation_repo,
            validator,
        }
    }

    pub fn list_observations(&self) -> ApiResult<CollectionResponse<ProductionObservationRecord>> {
        Ok(CollectionResponse::new(self.observation_repo.list_active()?))
    }

    pub fn list_observations_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> ApiResult<Page<ProductionObservationRecord>> {
        let req = PageRequest::new(page, page_size);
        Ok(Page {
            data: self.observation_repo.list_page(req.page_size, req.offset())?,
            total: self.observation_repo.count_active()?,
            page: req.page,
            page_size: req.page_size,
        })
    }

    pub fn get_observation(&self, observation_id: &str) -> ApiResult<ProductionObservationRecord> {
        self.observation_repo
            .find_by_id(observation_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "ProductionObservationRecord(id={})不存在",
                    observation_id
                ))
            })
    }

    pub fn create_observation(
        &self,
        input: ObservationInput,
    ) -> ApiResult<CollectionResponse<ProductionObservationRecord>> {
        self.validator.validate_observation_input(&input)?;

        let ts = now();
        let observation = build_observation(Uuid::new_v4().to_string(), input, ts, ts);
        self.observation_repo.insert(&observation)?;
        tracing::info!(
            observation_id = %observation.id,
            date = %observation.date,
            had_impact = observation.had_impact,
            "生产观察已创建"
        );
        self.refetch(&observation.id)
    }

    pub fn update_observation(
        &self,
        observation_id: &str,
        input: ObservationInput,
    ) -> ApiResult<CollectionResponse<ProductionObservationRecord>> {
        let existing = self.get_observation(observation_id)?;
        self.validator.validate_observation_input(&input)?;

        let observation =
            build_observation(observation_id.to_string(), input, existing.created_at, now());
        self.observation_repo.update(&observation)?;
        tracing::info!(observation_id = %observation_id, "生产观察已更新");
        self.refetch(observation_id)
    }

    /// 软删除
    pub fn delete_observation(
        &self,
        observation_id: &str,
    ) -> ApiResult<CollectionResponse<ProductionObservationRecord>> {
        self.observation_repo.soft_delete(observation_id, now())?;
        tracing::info!(observation_id = %observation_id, "生产观察已删除");
        self.refetch(observation_id)
    }

    /// 按日批量删除（逐条软删除，单条失败不中断）
    pub fn delete_date_batch(
        &self,
        date: &str,
    ) -> ApiResult<BatchDeleteResponse<ProductionObservationRecord>> {
        let day = parse_iso_date(date)
            .ok_or_else(|| ApiError::InvalidInput(format!("date 格式应为 YYYY-MM-DD: {}", date)))?;
        let iso = day.format("%Y-%m-%d").to_string();

        let mut outcome = BatchOutcome::default();
        for observation in self.observation_repo.list_by_date(&iso)? {
            match self.observation_repo.soft_delete(&observation.id, now()) {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    tracing::warn!(observation_id = %observation.id, error = %e, "按日删除: 单条失败");
                    outcome.record_failure(&observation.id, e.to_string());
                }
            }
        }

        tracing::info!(
            date = %iso,
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "按日批量删除完成"
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
            data: self.observation_repo.list_active()?,
        })
    }

    fn refetch(
        &self,
        affected_id: &str,
    ) -> ApiResult<CollectionResponse<ProductionObservationRecord>> {
        Ok(CollectionResponse::with_affected(
            affected_id,
            self.observation_repo.list_active()?,
        ))
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

// 日期统一存为 YYYY-MM-DD
fn build_observation(
    id: String,
    input: ObservationInput,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
) -> ProductionObservationRecord {
    let date = parse_iso_date(&input.date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or(input.date);
    ProductionObservationRecord {
        id,
        date,
        sector: input.sector,
        product: input.product.trim().to_string(),
        observation_type: input.observation_type.trim().to_string(),
        description: input.description,
        had_impact: input.had_impact,
        created_at,
        updated_at,
    }
}
