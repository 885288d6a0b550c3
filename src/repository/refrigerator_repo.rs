// ==========================================
// 物流管理系统 - 冰箱登记仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::refrigerator::Refrigerator;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, serialNumber, brand, model, facilityId,
        createdBy, modifiedBy, createdDate, modifiedDate
    FROM refrigerators
"#;

// ==========================================
// RefrigeratorRepository - 冰箱仓储
// ==========================================
/// 冰箱仓储
/// 职责: 管理 refrigerators 表的写入与查询
pub struct RefrigeratorRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RefrigeratorRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 登记冰箱
    ///
    /// # 返回
    /// - Ok(i64): 生成的冰箱 id
    /// - Err(UniqueConstraintViolation): 同一机构下序列号重复
    /// - Err(ForeignKeyViolation): 机构不存在
    pub fn insert(&self, refrigerator: &Refrigerator) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO refrigerators (
                serialNumber, brand, model, facilityId, createdBy, modifiedBy
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                refrigerator.serial_number,
                refrigerator.brand,
                refrigerator.model,
                refrigerator.facility_id,
                refrigerator.created_by,
                refrigerator.modified_by,
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(
            refrigerator_id = id,
            facility_id = refrigerator.facility_id,
            "冰箱已登记: {}",
            refrigerator.serial_number
        );
        Ok(id)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Refrigerator>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let refrigerator = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(refrigerator)
    }

    /// 按机构 + 序列号查询
    pub fn find_by_serial_number(
        &self,
        facility_id: i64,
        serial_number: &str,
    ) -> RepositoryResult<Option<Refrigerator>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE facilityId = ?1 AND serialNumber = ?2", SELECT_COLUMNS);
        let refrigerator = conn
            .query_row(&sql, params![facility_id, serial_number], Self::map_row)
            .optional()?;
        Ok(refrigerator)
    }

    /// 查询机构下全部冰箱（按序列号排序）
    pub fn find_by_facility_id(&self, facility_id: i64) -> RepositoryResult<Vec<Refrigerator>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE facilityId = ?1 ORDER BY serialNumber", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let refrigerators = stmt
            .query_map(params![facility_id], Self::map_row)?
            .collect::<SqliteResult<Vec<Refrigerator>>>()?;
        Ok(refrigerators)
    }

    fn map_row(row: &Row) -> SqliteResult<Refrigerator> {
        Ok(Refrigerator {
            id: Some(row.get(0)?),
            serial_number: row.get(1)?,
            brand: row.get(2)?,
            model: row.get(3)?,
            facility_id: row.get(4)?,
            created_by: row.get(5)?,
            modified_by: row.get(6)?,
            created_date: row.get(7)?,
            modified_date: row.get(8)?,
        })
    }
}
