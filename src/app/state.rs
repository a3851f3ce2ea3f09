// ==========================================
// IMAC Congelados 生产管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, InputValidator, ObservationApi, ProductionApi};
use crate::config::ConfigManager;
use crate::db::{configure_sqlite_connection, init_schema};
use crate::domain::SectorCatalog;
use crate::repository::{ObservationRepository, ProductionSpeedRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "IMAC_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源（单一共享连接）
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生产速度API
    pub production_api: Arc<ProductionApi>,

    /// 生产观察API
    pub observation_api: Arc<ObservationApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 部门目录
    pub catalog: Arc<SectorCatalog>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（不存在时自动创建并建表）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = Connection::open(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        configure_sqlite_connection(&conn).map_err(|e| format!("连接配置失败: {}", e))?;
        init_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let speed_repo = Arc::new(ProductionSpeedRepository::from_connection(conn.clone()));
        let observation_repo = Arc::new(ObservationRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let catalog = Arc::new(SectorCatalog::builtin());
        let validator = Arc::new(InputValidator::new(catalog.clone()));

        let production_api = Arc::new(ProductionApi::new(
            speed_repo.clone(),
            config_manager.clone(),
            validator.clone(),
        ));
        let observation_api = Arc::new(ObservationApi::new(observation_repo.clone(), validator));
        let dashboard_api = Arc::new(DashboardApi::new(
            speed_repo,
            observation_repo,
            config_manager.clone(),
            catalog.clone(),
        ));

        tracing::info!("AppState初始化完成");
        Ok(Self {
            db_path,
            production_api,
            observation_api,
            dashboard_api,
            config_manager,
            catalog,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

/// 默认数据库路径
///
/// 优先级: IMAC_DB_PATH > 用户数据目录 > ./imac_congelados.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./imac_congelados.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        let dir = data_dir.join("imac-congelados-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("imac-congelados");

        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("imac_congelados.db");
        }
    }

    path.to_string_lossy().to_string()
}
