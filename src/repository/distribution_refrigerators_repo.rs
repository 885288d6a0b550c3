// ==========================================
// 物流管理系统 - 配送冰箱聚合仓储
// ==========================================
// 聚合: distribution_refrigerators → refrigerator_readings → refrigerator_problems
// 写入契约 (两阶段):
//   1. insert(聚合根)           → 返回聚合根 id
//   2. insert_reading(读数)      → 读数须已回填聚合根 id
//   3. insert_problems(故障)     → 故障须已回填读数 id
// save() 在单个事务内按上述顺序完成整棵聚合的写入
// ==========================================

use crate::domain::refrigerator::{
    DistributionRefrigerators, RefrigeratorProblem, RefrigeratorReading, RefrigeratorSnapshot,
};
use crate::domain::types::FunctioningStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_READING_COLUMNS: &str = r#"
    SELECT
        r.id, r.distributionRefrigeratorsId, r.refrigeratorId,
        r.refrigeratorSerialNumber, r.refrigeratorBrand, r.refrigeratorModel,
        r.temperature, r.functioningCorrectly, r.lowAlarmEvents, r.highAlarmEvents,
        r.problemSinceLastTime, r.notes,
        p.id, p.operatorError, p.burnerProblem, p.gasLeakage, p.egpFault,
        p.thermostatSetting, p.other, p.notes
    FROM refrigerator_readings r
    LEFT JOIN refrigerator_problems p ON p.readingId = r.id
"#;

// ==========================================
// DistributionRefrigeratorsRepository
// ==========================================
/// 配送冰箱聚合仓储
/// 红线: 不含业务逻辑，只负责数据访问与写入顺序
pub struct DistributionRefrigeratorsRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DistributionRefrigeratorsRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 写入聚合根（不级联写入读数）
    ///
    /// # 返回
    /// - Ok(i64): 聚合根 id，调用方据此回填读数
    /// - Err(UniqueConstraintViolation): (facility_id, distribution_id) 已存在
    /// - Err(ForeignKeyViolation): 机构或配送不存在
    pub fn insert(&self, aggregate: &DistributionRefrigerators) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        insert_parent(&conn, aggregate)
    }

    /// 写入读数
    ///
    /// # 错误
    /// - ValidationError: 读数未回填聚合根 id
    /// - ForeignKeyViolation: 聚合根不存在
    pub fn insert_reading(&self, reading: &RefrigeratorReading) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        insert_reading_row(&conn, reading)
    }

    /// 写入故障报告
    ///
    /// # 错误
    /// - ValidationError: 故障未回填读数 id
    /// - ForeignKeyViolation: 读数不存在
    /// - UniqueConstraintViolation: 该读数已有故障报告
    pub fn insert_problems(&self, problem: &RefrigeratorProblem) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        insert_problem_row(&conn, problem)
    }

    /// 在单个事务内写入整棵聚合（聚合根 → 读数 → 故障）
    ///
    /// 任一步失败时整体回滚，不会留下孤立的聚合根
    pub fn save(&self, aggregate: &DistributionRefrigerators) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let parent_id = insert_parent(&tx, aggregate)?;

        for reading in &aggregate.readings {
            let reading = reading.clone().with_distribution_refrigerators_id(parent_id);
            let reading_id = insert_reading_row(&tx, &reading)?;

            if let Some(problem) = reading.problem {
                insert_problem_row(&tx, &problem.with_reading_id(reading_id))?;
            }
        }

        tx.commit()?;
        tracing::info!(
            distribution_refrigerators_id = parent_id,
            readings = aggregate.readings.len(),
            "配送冰箱聚合已写入"
        );
        Ok(parent_id)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 按 (机构, 配送) 查询聚合，读数全部加载
    ///
    /// # 返回
    /// - Ok(Some(..)): 聚合及其全部读数（读数带故障报告）
    /// - Ok(None): 未找到
    pub fn get_by(
        &self,
        facility_id: i64,
        distribution_id: i64,
    ) -> RepositoryResult<Option<DistributionRefrigerators>> {
        let mut conn = self.get_conn()?;
        // 读事务保证聚合根与读数来自同一快照
        let tx = conn.transaction()?;

        let parent_id: Option<i64> = tx
            .query_row(
                "SELECT id FROM distribution_refrigerators WHERE facilityId = ?1 AND distributionId = ?2",
                params![facility_id, distribution_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(parent_id) = parent_id else {
            return Ok(None);
        };

        let readings = select_readings_by_parent(&tx, parent_id)?;
        tx.commit()?;

        Ok(Some(
            DistributionRefrigerators::new(facility_id, distribution_id, readings).with_id(parent_id),
        ))
    }

    /// 按 id 查询读数
    pub fn find_reading_by_id(&self, reading_id: i64) -> RepositoryResult<Option<RefrigeratorReading>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE r.id = ?1", SELECT_READING_COLUMNS);
        let reading = conn
            .query_row(&sql, params![reading_id], map_reading_row)
            .optional()?;
        Ok(reading)
    }

    /// 查询聚合根下全部读数（按写入顺序）
    pub fn find_readings_by_distribution_refrigerators_id(
        &self,
        distribution_refrigerators_id: i64,
    ) -> RepositoryResult<Vec<RefrigeratorReading>> {
        let conn = self.get_conn()?;
        select_readings_by_parent(&conn, distribution_refrigerators_id)
    }

    /// 按读数 id 查询故障报告
    pub fn find_problem_by_reading_id(
        &self,
        reading_id: i64,
    ) -> RepositoryResult<Option<RefrigeratorProblem>> {
        let conn = self.get_conn()?;
        let problem = conn
            .query_row(
                r#"
                SELECT id, readingId, operatorError, burnerProblem, gasLeakage,
                       egpFault, thermostatSetting, other, notes
                FROM refrigerator_problems
                WHERE readingId = ?1
                "#,
                params![reading_id],
                |row| {
                    Ok(RefrigeratorProblem {
                        id: Some(row.get(0)?),
                        reading_id: Some(row.get(1)?),
                        operator_error: row.get(2)?,
                        burner_problem: row.get(3)?,
                        gas_leakage: row.get(4)?,
                        egp_fault: row.get(5)?,
                        thermostat_setting: row.get(6)?,
                        other: row.get(7)?,
                        notes: row.get(8)?,
                    })
                },
            )
            .optional()?;
        Ok(problem)
    }
}

// ==========================================
// 行级写入（供单步写入与事务写入复用）
// ==========================================

fn insert_parent(conn: &Connection, aggregate: &DistributionRefrigerators) -> RepositoryResult<i64> {
    conn.execute(
        "INSERT INTO distribution_refrigerators (facilityId, distributionId) VALUES (?1, ?2)",
        params![aggregate.facility_id, aggregate.distribution_id],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_reading_row(conn: &Connection, reading: &RefrigeratorReading) -> RepositoryResult<i64> {
    let parent_id = reading.distribution_refrigerators_id.ok_or_else(|| {
        RepositoryError::ValidationError("读数缺少 distributionRefrigeratorsId，需先写入聚合根".to_string())
    })?;

    let snapshot = reading.refrigerator.as_ref();
    conn.execute(
        r#"
        INSERT INTO refrigerator_readings (
            distributionRefrigeratorsId, refrigeratorId,
            refrigeratorSerialNumber, refrigeratorBrand, refrigeratorModel,
            temperature, functioningCorrectly, lowAlarmEvents, highAlarmEvents,
            problemSinceLastTime, notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            parent_id,
            snapshot.and_then(|s| s.refrigerator_id),
            snapshot.map(|s| s.serial_number.as_str()),
            snapshot.and_then(|s| s.brand.as_deref()),
            snapshot.and_then(|s| s.model.as_deref()),
            reading.temperature,
            reading.functioning_correctly.map(|s| s.to_db_str()),
            reading.low_alarm_events,
            reading.high_alarm_events,
            reading.problem_since_last_time.map(|s| s.to_db_str()),
            reading.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_problem_row(conn: &Connection, problem: &RefrigeratorProblem) -> RepositoryResult<i64> {
    let reading_id = problem.reading_id.ok_or_else(|| {
        RepositoryError::ValidationError("故障报告缺少 readingId，需先写入读数".to_string())
    })?;

    conn.execute(
        r#"
        INSERT INTO refrigerator_problems (
            readingId, operatorError, burnerProblem, gasLeakage,
            egpFault, thermostatSetting, other, notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            reading_id,
            problem.operator_error,
            problem.burner_problem,
            problem.gas_leakage,
            problem.egp_fault,
            problem.thermostat_setting,
            problem.other,
            problem.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn select_readings_by_parent(conn: &Connection, parent_id: i64) -> RepositoryResult<Vec<RefrigeratorReading>> {
    let sql = format!(
        "{} WHERE r.distributionRefrigeratorsId = ?1 ORDER BY r.id",
        SELECT_READING_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let readings = stmt
        .query_map(params![parent_id], map_reading_row)?
        .collect::<SqliteResult<Vec<RefrigeratorReading>>>()?;
    Ok(readings)
}

/// 映射读数行（含 LEFT JOIN 的故障列）
fn map_reading_row(row: &Row) -> SqliteResult<RefrigeratorReading> {
    let reading_id: i64 = row.get(0)?;

    let serial_number: Option<String> = row.get(3)?;
    let refrigerator_id: Option<i64> = row.get(2)?;
    let brand: Option<String> = row.get(4)?;
    let model: Option<String> = row.get(5)?;
    let refrigerator = serial_number.map(|serial_number| RefrigeratorSnapshot {
        refrigerator_id,
        serial_number,
        brand,
        model,
    });

    let problem_id: Option<i64> = row.get(12)?;
    let problem = match problem_id {
        Some(id) => Some(RefrigeratorProblem {
            id: Some(id),
            reading_id: Some(reading_id),
            operator_error: row.get(13)?,
            burner_problem: row.get(14)?,
            gas_leakage: row.get(15)?,
            egp_fault: row.get(16)?,
            thermostat_setting: row.get(17)?,
            other: row.get(18)?,
            notes: row.get(19)?,
        }),
        None => None,
    };

    Ok(RefrigeratorReading {
        id: Some(reading_id),
        distribution_refrigerators_id: Some(row.get(1)?),
        refrigerator,
        temperature: row.get(6)?,
        functioning_correctly: parse_flag(row.get(7)?),
        low_alarm_events: row.get(8)?,
        high_alarm_events: row.get(9)?,
        problem_since_last_time: parse_flag(row.get(10)?),
        notes: row.get(11)?,
        problem,
    })
}

fn parse_flag(raw: Option<String>) -> Option<FunctioningStatus> {
    raw.as_deref().and_then(FunctioningStatus::parse)
}
