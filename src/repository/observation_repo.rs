// ==========================================
// IMAC Congelados 生产管理系统 - 生产观察仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 删除为软删除 (deleted_at)，查询只返回未删除记录
// ==========================================

use crate::domain::ProductionObservationRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_ACTIVE: &str = r#"
    SELECT
        observation_id, obs_date, sector, product, observation_type,
        description, had_impact, created_at, updated_at
    FROM production_observation
    WHERE deleted_at IS NULL
"#;

/// 生产观察仓储
pub struct ObservationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ObservationRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, observation: &ProductionObservationRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO production_observation (
                observation_id, obs_date, sector, product, observation_type,
                description, had_impact, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                observation.id,
                observation.date,
                observation.sector,
                observation.product,
                observation.observation_type,
                observation.description,
                observation.had_impact,
                observation.created_at,
                observation.updated_at,
            ],
        )?;
        Ok(())
    }

    /// 更新未删除的观察记录
    pub fn update(&self, observation: &ProductionObservationRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE production_observation SET
                obs_date = ?2, sector = ?3, product = ?4, observation_type = ?5,
                description = ?6, had_impact = ?7, updated_at = ?8
            WHERE observation_id = ?1 AND deleted_at IS NULL
            "#,
            params![
                observation.id,
                observation.date,
                observation.sector,
                observation.product,
                observation.observation_type,
                observation.description,
                observation.had_impact,
                observation.updated_at,
            ],
        )?;
        if affected == 0 {
            return Err(not_found(&observation.id));
        }
        Ok(())
    }

    pub fn find_by_id(&self, observation_id: &str) -> RepositoryResult<Option<ProductionObservationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} AND observation_id = ?1", SELECT_ACTIVE))?;
        match stmt.query_row(params![observation_id], map_row) {
            Ok(observation) => Ok(Some(observation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 全部未删除记录（日期倒序）
    pub fn list_active(&self) -> RepositoryResult<Vec<ProductionObservationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY obs_date DESC, created_at DESC",
            SELECT_ACTIVE
        ))?;
        let observations = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(observations)
    }

    pub fn list_page(&self, limit: usize, offset: usize) -> RepositoryResult<Vec<ProductionObservationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY obs_date DESC, created_at DESC LIMIT ?1 OFFSET ?2",
            SELECT_ACTIVE
        ))?;
        let observations = stmt
            .query_map(params![limit as i64, offset as i64], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(observations)
    }

    pub fn count_active(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM production_observation WHERE deleted_at IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(total as usize)
    }

    /// 某日（YYYY-MM-DD）的未删除记录
    pub fn list_by_date(&self, date: &str) -> RepositoryResult<Vec<ProductionObservationRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} AND obs_date = ?1 ORDER BY created_at ASC",
            SELECT_ACTIVE
        ))?;
        let observations = stmt
            .query_map(params![date], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(observations)
    }

    /// 软删除（已删除的记录视为未找到）
    pub fn soft_delete(&self, observation_id: &str, deleted_at: NaiveDateTime) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE production_observation
            SET deleted_at = ?2, updated_at = ?2
            WHERE observation_id = ?1 AND deleted_at IS NULL
            "#,
            params![observation_id, deleted_at],
        )?;
        if affected == 0 {
            return Err(not_found(observation_id));
        }
        Ok(())
    }
}

fn not_found(observation_id: &str) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "ProductionObservationRecord".to_string(),
        id: observation_id.to_string(),
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<ProductionObservationRecord> {
    Ok(ProductionObservationRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        sector: row.get(2)?,
        product: row.get(3)?,
        observation_type: row.get(4)?,
        description: row.get(5)?,
        had_impact: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup_repo() -> ObservationRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ObservationRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 5)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn observation(id: &str, date: &str, had_impact: bool) -> ProductionObservationRecord {
        ProductionObservationRecord {
            id: id.to_string(),
            date: date.to_string(),
            sector: "MASSAS".to_string(),
            product: "Nhoque".to_string(),
            observation_type: "Máquina".to_string(),
            description: "Extrusora parada".to_string(),
            had_impact,
            created_at: ts(8),
            updated_at: ts(8),
        }
    }

    #[test]
    fn test_insert_find_update() {
        let repo = setup_repo();
        let mut o = observation("o1", "2025-03-05", true);
        repo.insert(&o).unwrap();
        assert_eq!(repo.find_by_id("o1").unwrap().unwrap(), o);

        o.had_impact = false;
        o.updated_at = ts(9);
        repo.update(&o).unwrap();
        assert!(!repo.find_by_id("o1").unwrap().unwrap().had_impact);
    }

    #[test]
    fn test_soft_delete_hides_record() {
        let repo = setup_repo();
        repo.insert(&observation("o1", "2025-03-05", true)).unwrap();
        repo.insert(&observation("o2", "2025-03-06", false)).unwrap();

        repo.soft_delete("o1", ts(10)).unwrap();
        assert!(repo.find_by_id("o1").unwrap().is_none());
        assert_eq!(repo.count_active().unwrap(), 1);
        assert!(matches!(
            repo.soft_delete("o1", ts(11)),
            Err(RepositoryError::NotFound { .. })
        ));

        let mut deleted = observation("o1", "2025-03-05", true);
        deleted.updated_at = ts(12);
        assert!(matches!(repo.update(&deleted), Err(RepositoryError::NotFound { .. })));
    }

    #[test]
    fn test_list_active_by_date_and_page() {
        let repo = setup_repo();
        repo.insert(&observation("o1", "2025-03-05", true)).unwrap();
        repo.insert(&observation("o2", "2025-03-07", false)).unwrap();
        repo.insert(&observation("o3", "2025-03-05", false)).unwrap();

        let all = repo.list_active().unwrap();
        assert_eq!(all[0].id, "o2");
        assert_eq!(repo.list_by_date("2025-03-05").unwrap().len(), 2);
        assert_eq!(repo.list_page(10, 2).unwrap().len(), 1);
    }
}
