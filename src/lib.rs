// ==========================================
// IMAC Congelados 生产管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 生产速度分析（计划 vs 实际、最差产品、月度影响率）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 聚合与排行
pub mod engine;

// 配置层 - 报表参数与产品目录
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    KpiSummary, MonthKey, MonthlyImpactEntry, ProductionObservationRecord, ProductionSpeedInput,
    ProductionSpeedRecord, Sector, SectorCatalog, SectorFilter,
};

// 引擎
pub use engine::{
    BulkRegistrationEngine, ImpactRateEngine, PerformanceRankingEngine, ProductionReportBuilder,
    ProductionSpeedView, RecordFilter,
};

// API
pub use api::{ApiError, DashboardApi, ObservationApi, ProductionApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "IMAC Congelados - Velocidade de Produção";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";
