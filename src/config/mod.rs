// ==========================================
// IMAC Congelados 生产管理系统 - 配置层
// ==========================================
// 职责: 报表参数与产品目录
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod report_settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, default_products, ConfigManager};
pub use report_settings::ReportSettings;
