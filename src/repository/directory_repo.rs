// ==========================================
// 物流管理系统 - 机构 / 配送 目录仓储
// ==========================================
// 说明: 机构与配送由上游系统维护；此处提供最小的写入/查询能力
//       以及供服务层校验 id 的目录接口
// ==========================================

use crate::domain::facility::{Distribution, Facility};
use crate::domain::types::DistributionStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// Trait: 协作方目录
// ==========================================

/// 机构目录：解析/校验机构 id
pub trait FacilityDirectory: Send + Sync {
    fn facility_exists(&self, facility_id: i64) -> RepositoryResult<bool>;
}

/// 配送目录：解析/校验配送 id
pub trait DistributionDirectory: Send + Sync {
    fn distribution_exists(&self, distribution_id: i64) -> RepositoryResult<bool>;
}

// ==========================================
// FacilityRepository - 机构仓储
// ==========================================
pub struct FacilityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FacilityRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入机构，返回生成的 id
    pub fn insert(&self, facility: &Facility) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO facilities (code, name, active) VALUES (?1, ?2, ?3)",
            params![facility.code, facility.name, facility.active],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Facility>> {
        let conn = self.get_conn()?;
        let facility = conn
            .query_row(
                "SELECT id, code, name, active FROM facilities WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Facility {
                        id: Some(row.get(0)?),
                        code: row.get(1)?,
                        name: row.get(2)?,
                        active: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(facility)
    }
}

impl FacilityDirectory for FacilityRepository {
    fn facility_exists(&self, facility_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM facilities WHERE id = ?1",
                params![facility_id],
                |_row| Ok(true),
            )
            .optional()?;
        Ok(found.unwrap_or(false))
    }
}

// ==========================================
// DistributionRepository - 配送仓储
// ==========================================
pub struct DistributionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DistributionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入配送，返回生成的 id
    ///
    /// # 错误
    /// - UniqueConstraintViolation: 同一 (配送区域, 项目, 周期) 已存在配送
    pub fn insert(&self, distribution: &Distribution) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO distributions (
                deliveryZoneId, programId, periodId, status, createdBy, modifiedBy
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                distribution.delivery_zone_id,
                distribution.program_id,
                distribution.period_id,
                distribution.status.to_db_str(),
                distribution.created_by,
                distribution.modified_by,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Distribution>> {
        let conn = self.get_conn()?;
        let distribution = conn
            .query_row(
                r#"
                SELECT id, deliveryZoneId, programId, periodId, status, createdBy, modifiedBy
                FROM distributions
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    let raw_status: String = row.get(4)?;
                    let status = DistributionStatus::parse(&raw_status).ok_or_else(|| {
                        rusqlite::Error::FromSqlConversionFailure(
                            4,
                            Type::Text,
                            format!("未知配送状态: {}", raw_status).into(),
                        )
                    })?;
                    Ok(Distribution {
                        id: Some(row.get(0)?),
                        delivery_zone_id: row.get(1)?,
                        program_id: row.get(2)?,
                        period_id: row.get(3)?,
                        status,
                        created_by: row.get(5)?,
                        modified_by: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(distribution)
    }

    /// 更新配送状态
    pub fn update_status(&self, id: i64, status: DistributionStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE distributions SET status = ?1, modifiedDate = datetime('now') WHERE id = ?2",
            params![status.to_db_str(), id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Distribution", id));
        }
        Ok(())
    }
}

impl DistributionDirectory for DistributionRepository {
    fn distribution_exists(&self, distribution_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM distributions WHERE id = ?1",
                params![distribution_id],
                |_row| Ok(true),
            )
            .optional()?;
        Ok(found.unwrap_or(false))
    }
}
