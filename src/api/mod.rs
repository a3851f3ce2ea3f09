// ==========================================
// IMAC Congelados 生产管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口（校验、持久化、重新读取、视图组装）
// ==========================================

pub mod dashboard_api;
pub mod dto;
pub mod error;
pub mod observation_api;
pub mod production_api;
pub mod validator;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use dto::{BatchDeleteResponse, BulkRegisterResponse, CollectionResponse, Page, PageRequest};
pub use error::{ApiError, ApiResult, ErrorResponse, ValidationViolation};
pub use observation_api::ObservationApi;
pub use production_api::ProductionApi;
pub use validator::InputValidator;
