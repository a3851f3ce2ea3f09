// ==========================================
// IMAC Congelados 生产管理系统 - 生产速度仓储
// ==========================================
// 红线: Repository 不含业务逻辑（合计值由上层计算后写入）
// 存储: production_speed 表，日条目以 JSON 列保存
// ==========================================

use crate::domain::{DailyProduction, ProductionSpeedRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT
        record_id, mes_ano, sector, produto, meta_mes,
        daily_production_json, total_programado, total_realizado, velocidade,
        created_at, updated_at
    FROM production_speed
"#;

// mes_ano 为 "MM/YYYY"，按 年 -> 月 倒序
const ORDER_RECENT_FIRST: &str = r#"
    ORDER BY substr(mes_ano, 4, 4) DESC, substr(mes_ano, 1, 2) DESC, sector ASC, produto ASC
"#;

// ==========================================
// ProductionSpeedRepository
// ==========================================
/// 生产速度仓储
/// 职责: 管理 production_speed 表的 CRUD 操作
pub struct ProductionSpeedRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionSpeedRepository {
    /// 创建新的仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入记录
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 同一 (月份, 部门, 产品) 已存在
    pub fn insert(&self, record: &ProductionSpeedRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO production_speed (
                record_id, mes_ano, sector, produto, meta_mes,
                daily_production_json, total_programado, total_realizado, velocidade,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                record.id,
                record.mes_ano,
                record.sector,
                record.produto,
                record.meta_mes,
                serde_json::to_string(&record.daily_production)?,
                record.total_programado,
                record.total_realizado,
                record.velocidade,
                record.created_at,
                record.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 更新记录（按 record_id，整行覆盖，created_at 不变）
    pub fn update(&self, record: &ProductionSpeedRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE production_speed SET
                mes_ano = ?2, sector = ?3, produto = ?4, meta_mes = ?5,
                daily_production_json = ?6,
                total_programado = ?7, total_realizado = ?8, velocidade = ?9,
                updated_at = ?10
            WHERE record_id = ?1
            "#,
            params![
                record.id,
                record.mes_ano,
                record.sector,
                record.produto,
                record.meta_mes,
                serde_json::to_string(&record.daily_production)?,
                record.total_programado,
                record.total_realizado,
                record.velocidade,
                record.updated_at,
            ],
        )?;

        if affected == 0 {
            return Err(not_found(&record.id));
        }
        Ok(())
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some): 找到记录
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, record_id: &str) -> RepositoryResult<Option<ProductionSpeedRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} WHERE record_id = ?1", SELECT_COLUMNS))?;

        let result = stmt.query_row(params![record_id], map_row);
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 全量查询（最近的月份在前）
    pub fn list_all(&self) -> RepositoryResult<Vec<ProductionSpeedRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} {}", SELECT_COLUMNS, ORDER_RECENT_FIRST))?;
        let records = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 分页查询
    pub fn list_page(&self, limit: usize, offset: usize) -> RepositoryResult<Vec<ProductionSpeedRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} {} LIMIT ?1 OFFSET ?2",
            SELECT_COLUMNS, ORDER_RECENT_FIRST
        ))?;
        let records = stmt
            .query_map(params![limit as i64, offset as i64], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 记录总数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM production_speed", [], |row| row.get(0))?;
        Ok(total as usize)
    }

    /// 查询某月的全部记录
    pub fn list_by_month(&self, mes_ano: &str) -> RepositoryResult<Vec<ProductionSpeedRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE mes_ano = ?1 ORDER BY sector ASC, produto ASC",
            SELECT_COLUMNS
        ))?;
        let records = stmt
            .query_map(params![mes_ano], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 删除记录
    pub fn delete_by_id(&self, record_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM production_speed WHERE record_id = ?1",
            params![record_id],
        )?;
        if affected == 0 {
            return Err(not_found(record_id));
        }
        Ok(())
    }
}

fn not_found(record_id: &str) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "ProductionSpeedRecord".to_string(),
        id: record_id.to_string(),
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<ProductionSpeedRecord> {
    let daily_json: String = row.get(5)?;
    let daily_production: Vec<DailyProduction> = serde_json::from_str(&daily_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(ProductionSpeedRecord {
        id: row.get(0)?,
        mes_ano: row.get(1)?,
        sector: row.get(2)?,
        produto: row.get(3)?,
        meta_mes: row.get(4)?,
        daily_production,
        total_programado: row.get(6)?,
        total_realizado: row.get(7)?,
        velocidade: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductionTotals;
    use chrono::NaiveDate;

    fn setup_repo() -> ProductionSpeedRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ProductionSpeedRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn record(id: &str, mes_ano: &str, produto: &str, realizado: f64) -> ProductionSpeedRecord {
        let mut days = vec![DailyProduction::default(); 31];
        days[2] = DailyProduction::new(100.0, realizado);
        let totals = ProductionTotals::from_days(&days);
        let now = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        ProductionSpeedRecord {
            id: id.to_string(),
            mes_ano: mes_ano.to_string(),
            sector: "SALGADOS".to_string(),
            produto: produto.to_string(),
            meta_mes: 3000.0,
            daily_production: days,
            total_programado: totals.total_programado,
            total_realizado: totals.total_realizado,
            velocidade: totals.velocidade,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_insert_and_find() {
        let repo = setup_repo();
        let r = record("r1", "03/2025", "Coxinha", 80.0);
        repo.insert(&r).unwrap();

        let found = repo.find_by_id("r1").unwrap().unwrap();
        assert_eq!(found, r);
        assert_eq!(found.daily_production[2].realizado, 80.0);
        assert!(repo.find_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn test_unique_month_sector_product() {
        let repo = setup_repo();
        repo.insert(&record("r1", "03/2025", "Coxinha", 80.0)).unwrap();
        let err = repo
            .insert(&record("r2", "03/2025", "Coxinha", 90.0))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_update_and_delete() {
        let repo = setup_repo();
        let mut r = record("r1", "03/2025", "Coxinha", 80.0);
        repo.insert(&r).unwrap();

        r.meta_mes = 5000.0;
        repo.update(&r).unwrap();
        assert_eq!(repo.find_by_id("r1").unwrap().unwrap().meta_mes, 5000.0);

        repo.delete_by_id("r1").unwrap();
        assert!(matches!(
            repo.delete_by_id("r1"),
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            repo.update(&r),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_order_and_paging() {
        let repo = setup_repo();
        repo.insert(&record("a", "12/2024", "Coxinha", 80.0)).unwrap();
        repo.insert(&record("b", "02/2025", "Coxinha", 80.0)).unwrap();
        repo.insert(&record("c", "01/2025", "Coxinha", 80.0)).unwrap();
        repo.insert(&record("d", "02/2025", "Esfiha", 80.0)).unwrap();

        let all = repo.list_all().unwrap();
        let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c", "a"]);

        assert_eq!(repo.count().unwrap(), 4);
        let page = repo.list_page(2, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, "c");

        assert_eq!(repo.list_by_month("02/2025").unwrap().len(), 2);
    }
}
