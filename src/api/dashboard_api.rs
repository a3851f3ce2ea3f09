// ==========================================
// IMAC Congelados 生产管理系统 - 驾驶舱 API
// ==========================================
// 职责: 读取全量集合 + 报表参数，组装生产速度页面视图
// 约束: 每次调用重新读取并重新计算（无缓存）
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ReportSettings};
use crate::domain::SectorCatalog;
use crate::engine::{ProductionReportBuilder, ProductionSpeedView, RecordFilter};
use crate::repository::{ObservationRepository, ProductionSpeedRepository};

// ==========================================
// DashboardApi - 驾驶舱 API
// ==========================================
pub struct DashboardApi {
    speed_repo: Arc<ProductionSpeedRepository>,
    observation_repo: Arc<ObservationRepository>,
    config_manager: Arc<ConfigManager>,
    catalog: Arc<SectorCatalog>,
    builder: ProductionReportBuilder,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    pub fn new(
        speed_repo: Arc<ProductionSpeedRepository>,
        observation_repo: Arc<ObservationRepository>,
        config_manager: Arc<ConfigManager>,
        catalog: Arc<SectorCatalog>,
    ) -> Self {
        Self {
            speed_repo,
            observation_repo,
            config_manager,
            catalog,
            builder: ProductionReportBuilder::new(),
        }
    }

    /// 生产速度页面视图
    ///
    /// # 参数
    /// - filter: 日期区间 / 部门 / 产品关键字
    ///
    /// # 返回
    /// - Ok(ProductionSpeedView): KPI、分组表格、趋势、日产量、最差产品、影响率
    /// - Err(ApiError): 数据读取失败
    pub fn production_speed_view(&self, filter: &RecordFilter) -> ApiResult<ProductionSpeedView> {
        let records = self.speed_repo.list_all()?;
        let observations = self.observation_repo.list_active()?;
        let settings = self.report_settings()?;

        Ok(self
            .builder
            .build(&records, &observations, filter, &settings, &self.catalog))
    }

    /// 当前报表参数
    pub fn report_settings(&self) -> ApiResult<ReportSettings> {
        self.config_manager
            .get_report_settings()
            .map_err(|e| ApiError::InternalError(format!("报表参数读取失败: {}", e)))
    }

    /// 部门目录（编码 -> 显示名），按目录顺序
    pub fn sector_options(&self) -> Vec<(String, String)> {
        self.catalog
            .codes()
            .iter()
            .map(|code| (code.clone(), self.catalog.label_for(code)))
            .collect()
    }
}
