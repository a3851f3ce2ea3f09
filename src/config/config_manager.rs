// ==========================================
// IMAC Congelados 生产管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::sync::{Arc, Mutex};

use crate::config::report_settings::ReportSettings;
use crate::db::open_sqlite_connection;
use crate::domain::Sector;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        tracing::info!(key = key, "配置已更新");
        Ok(())
    }

    /// 读取 usize 配置；缺失或非法时返回默认值
    fn get_usize_or_default(&self, key: &str, default: usize) -> Result<usize, Box<dyn Error>> {
        let value = match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(v) if v > 0 => v,
                _ => {
                    tracing::warn!(key = key, value = %raw, "配置值非法，使用默认值 {}", default);
                    default
                }
            },
            None => default,
        };
        Ok(value)
    }

    // ==========================================
    // 报表参数
    // ==========================================

    /// 加载报表参数（缺失项使用默认值）
    pub fn get_report_settings(&self) -> Result<ReportSettings, Box<dyn Error>> {
        let defaults = ReportSettings::default();
        Ok(ReportSettings {
            impact_window_months: self.get_usize_or_default(
                config_keys::IMPACT_WINDOW_MONTHS,
                defaults.impact_window_months,
            )?,
            trend_window_months: self.get_usize_or_default(
                config_keys::TREND_WINDOW_MONTHS,
                defaults.trend_window_months,
            )?,
            worst_performer_limit: self.get_usize_or_default(
                config_keys::WORST_PERFORMER_LIMIT,
                defaults.worst_performer_limit,
            )?,
        })
    }

    // ==========================================
    // 产品目录
    // ==========================================

    /// 某部门的产品列表
    ///
    /// config_kv 中存在 `catalog.products/<SECTOR>` 时以其为准（JSON 数组），
    /// 否则使用内置目录；未知部门返回空列表。
    pub fn get_sector_products(&self, sector: &str) -> Result<Vec<String>, Box<dyn Error>> {
        let key = config_keys::sector_products_key(sector);
        match self.get_config_value(&key)? {
            Some(raw) => {
                let products: Vec<String> = serde_json::from_str(&raw)?;
                Ok(products)
            }
            None => Ok(default_products(sector)),
        }
    }

    /// 覆写某部门的产品列表
    pub fn set_sector_products(
        &self,
        sector: &str,
        products: &[String],
    ) -> Result<(), Box<dyn Error>> {
        let key = config_keys::sector_products_key(sector);
        self.set_global_config_value(&key, &serde_json::to_string(products)?)
    }

    /// 多个部门的产品目录（部门 -> 产品列表）
    pub fn get_product_catalog(
        &self,
        sectors: &[String],
    ) -> Result<BTreeMap<String, Vec<String>>, Box<dyn Error>> {
        let mut catalog = BTreeMap::new();
        for sector in sectors {
            catalog.insert(sector.clone(), self.get_sector_products(sector)?);
        }
        Ok(catalog)
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

/// 内置产品目录
pub fn default_products(sector: &str) -> Vec<String> {
    let products: &[&str] = match Sector::from_code(sector) {
        Some(Sector::Panificacao) => &["Pão Francês", "Pão de Forma", "Baguete"],
        Some(Sector::Confeitaria) => &["Bolo de Chocolate", "Torta de Limão", "Brigadeiro"],
        Some(Sector::Salgados) => &["Coxinha", "Esfiha", "Kibe", "Enroladinho"],
        Some(Sector::PaoDeQueijo) => &["Pão de Queijo Tradicional", "Pão de Queijo Coquetel"],
        Some(Sector::Massas) => &["Lasanha", "Nhoque", "Canelone"],
        Some(Sector::Embalagem) => &["Caixa Master", "Saco 1kg"],
        None => &[],
    };
    products.iter().map(|p| p.to_string()).collect()
}

// ==========================================
// 配置键常量
// ==========================================

pub mod config_keys {
    // 报表窗口
    pub const IMPACT_WINDOW_MONTHS: &str = "report.impact_window_months";
    pub const TREND_WINDOW_MONTHS: &str = "report.trend_window_months";

    // 最差产品排行
    pub const WORST_PERFORMER_LIMIT: &str = "report.worst_performer_limit";

    // 产品目录前缀
    pub const SECTOR_PRODUCTS_PREFIX: &str = "catalog.products/";

    pub fn sector_products_key(sector: &str) -> String {
        format!("{}{}", SECTOR_PRODUCTS_PREFIX, sector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_report_settings_defaults() {
        let manager = setup_manager();
        let settings = manager.get_report_settings().unwrap();
        assert_eq!(settings, ReportSettings::default());
        assert_eq!(settings.worst_performer_limit, 5);
        assert_eq!(settings.impact_window_months, 12);
    }

    #[test]
    fn test_report_settings_override_and_invalid() {
        let manager = setup_manager();
        manager
            .set_global_config_value(config_keys::IMPACT_WINDOW_MONTHS, "6")
            .unwrap();
        manager
            .set_global_config_value(config_keys::WORST_PERFORMER_LIMIT, "abc")
            .unwrap();
        let settings = manager.get_report_settings().unwrap();
        assert_eq!(settings.impact_window_months, 6);
        assert_eq!(settings.worst_performer_limit, 5);
    }

    #[test]
    fn test_sector_products_default_and_override() {
        let manager = setup_manager();
        assert_eq!(manager.get_sector_products("MASSAS").unwrap().len(), 3);
        assert!(manager.get_sector_products("DESCONHECIDO").unwrap().is_empty());

        manager
            .set_sector_products("MASSAS", &["Ravioli".to_string()])
            .unwrap();
        assert_eq!(manager.get_sector_products("MASSAS").unwrap(), vec!["Ravioli"]);

        let catalog = manager
            .get_product_catalog(&["MASSAS".to_string(), "SALGADOS".to_string()])
            .unwrap();
        assert_eq!(catalog["SALGADOS"].len(), 4);
    }

    #[test]
    fn test_config_snapshot() {
        let manager = setup_manager();
        manager
            .set_global_config_value(config_keys::TREND_WINDOW_MONTHS, "24")
            .unwrap();
        let snapshot = manager.get_config_snapshot().unwrap();
        assert!(snapshot.contains("report.trend_window_months"));
    }
}
