// ==========================================
// 物流管理系统 - 配送冰箱巡检 API
// ==========================================
// 职责: 配送冰箱聚合的写入与查询
// 写入方式:
//   - 两阶段: insert → insert_reading → insert_problems（调用方负责顺序）
//   - 原子:   save（校验机构/配送后在单个事务内写入整棵聚合）
// ==========================================

use std::sync::Arc;

use crate::api::error::{require_positive_id, ApiError, ApiResult};
use crate::domain::refrigerator::{DistributionRefrigerators, RefrigeratorProblem, RefrigeratorReading};
use crate::repository::directory_repo::{DistributionDirectory, FacilityDirectory};
use crate::repository::distribution_refrigerators_repo::DistributionRefrigeratorsRepository;

// ==========================================
// DistributionRefrigeratorsApi
// ==========================================

/// 配送冰箱巡检API
///
/// 职责：
/// 1. 聚合根写入（两阶段的第一阶段）
/// 2. 读数 / 故障报告写入（第二阶段）
/// 3. 整棵聚合的事务写入
/// 4. 按 (机构, 配送) 查询
pub struct DistributionRefrigeratorsApi {
    repo: Arc<DistributionRefrigeratorsRepository>,
    facilities: Arc<dyn FacilityDirectory>,
    distributions: Arc<dyn DistributionDirectory>,
}

impl DistributionRefrigeratorsApi {
    pub fn new(
        repo: Arc<DistributionRefrigeratorsRepository>,
        facilities: Arc<dyn FacilityDirectory>,
        distributions: Arc<dyn DistributionDirectory>,
    ) -> Self {
        Self {
            repo,
            facilities,
            distributions,
        }
    }

    /// 写入聚合根（不写入读数）
    ///
    /// # 返回
    /// - Ok(i64): 聚合根 id，用于回填读数
    /// - Err(ApiError::StorageError): (机构, 配送) 已存在或 id 不存在
    pub fn insert(&self, aggregate: &DistributionRefrigerators) -> ApiResult<i64> {
        require_positive_id("facilityId", aggregate.facility_id)?;
        require_positive_id("distributionId", aggregate.distribution_id)?;

        let id = self.repo.insert(aggregate).map_err(|e| {
            tracing::warn!(
                facility_id = aggregate.facility_id,
                distribution_id = aggregate.distribution_id,
                "配送冰箱聚合根写入失败: {}",
                e
            );
            ApiError::from(e)
        })?;

        tracing::info!(
            distribution_refrigerators_id = id,
            facility_id = aggregate.facility_id,
            distribution_id = aggregate.distribution_id,
            "配送冰箱聚合根已写入"
        );
        Ok(id)
    }

    /// 写入读数（须已回填聚合根 id）
    pub fn insert_reading(&self, reading: &RefrigeratorReading) -> ApiResult<i64> {
        validate_reading(reading)?;
        if reading.distribution_refrigerators_id.is_none() {
            return Err(ApiError::ValidationError(
                "读数缺少 distributionRefrigeratorsId，需先写入聚合根".to_string(),
            ));
        }

        let id = self.repo.insert_reading(reading).map_err(|e| {
            tracing::warn!(
                distribution_refrigerators_id = ?reading.distribution_refrigerators_id,
                "冰箱读数写入失败: {}",
                e
            );
            ApiError::from(e)
        })?;

        tracing::debug!(reading_id = id, "冰箱读数已写入");
        Ok(id)
    }

    /// 写入故障报告（须已回填读数 id）
    ///
    /// 不校验故障标记与 functioning_correctly 的一致性
    pub fn insert_problems(&self, problem: &RefrigeratorProblem) -> ApiResult<i64> {
        if problem.reading_id.is_none() {
            return Err(ApiError::ValidationError(
                "故障报告缺少 readingId，需先写入读数".to_string(),
            ));
        }

        let id = self.repo.insert_problems(problem).map_err(|e| {
            tracing::warn!(reading_id = ?problem.reading_id, "冰箱故障写入失败: {}", e);
            ApiError::from(e)
        })?;

        tracing::debug!(
            problem_id = id,
            reading_id = ?problem.reading_id,
            has_fault = problem.has_any_fault(),
            "冰箱故障已写入"
        );
        Ok(id)
    }

    /// 在单个事务内写入整棵聚合
    ///
    /// # 流程
    /// 1. 通过目录校验机构与配送存在
    /// 2. 聚合根 → 读数 → 故障 顺序写入，失败整体回滚
    pub fn save(&self, aggregate: &DistributionRefrigerators) -> ApiResult<i64> {
        require_positive_id("facilityId", aggregate.facility_id)?;
        require_positive_id("distributionId", aggregate.distribution_id)?;
        for reading in &aggregate.readings {
            validate_reading(reading)?;
        }

        if !self.facilities.facility_exists(aggregate.facility_id)? {
            return Err(ApiError::NotFound(format!(
                "Facility(id={})不存在",
                aggregate.facility_id
            )));
        }
        if !self.distributions.distribution_exists(aggregate.distribution_id)? {
            return Err(ApiError::NotFound(format!(
                "Distribution(id={})不存在",
                aggregate.distribution_id
            )));
        }

        self.repo.save(aggregate).map_err(|e| {
            tracing::warn!(
                facility_id = aggregate.facility_id,
                distribution_id = aggregate.distribution_id,
                "配送冰箱聚合写入失败(已回滚): {}",
                e
            );
            ApiError::from(e)
        })
    }

    /// 按 (机构, 配送) 查询聚合
    ///
    /// # 返回
    /// - Ok(DistributionRefrigerators): 聚合及全部读数
    /// - Err(ApiError::NotFound): 未找到
    pub fn get_by(&self, facility_id: i64, distribution_id: i64) -> ApiResult<DistributionRefrigerators> {
        require_positive_id("facilityId", facility_id)?;
        require_positive_id("distributionId", distribution_id)?;

        self.repo
            .get_by(facility_id, distribution_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "DistributionRefrigerators(facilityId={}, distributionId={})不存在",
                    facility_id, distribution_id
                ))
            })
    }
}

/// 读数字段校验
fn validate_reading(reading: &RefrigeratorReading) -> ApiResult<()> {
    if let Some(t) = reading.temperature {
        if !t.is_finite() {
            return Err(ApiError::InvalidInput(format!("温度必须为有限数值: {}", t)));
        }
    }
    for (field, value) in [
        ("lowAlarmEvents", reading.low_alarm_events),
        ("highAlarmEvents", reading.high_alarm_events),
    ] {
        if let Some(v) = value {
            if v < 0 {
                return Err(ApiError::InvalidInput(format!("{}不能为负数: {}", field, v)));
            }
        }
    }
    if let Some(snapshot) = &reading.refrigerator {
        if snapshot.serial_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("冰箱序列号不能为空".to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::refrigerator::RefrigeratorSnapshot;

    #[test]
    fn test_validate_reading() {
        assert!(validate_reading(&RefrigeratorReading::default()).is_ok());
        assert!(validate_reading(&RefrigeratorReading::default().temperature(f64::NAN)).is_err());
        assert!(validate_reading(&RefrigeratorReading::default().alarm_events(-1, 0)).is_err());

        let blank_serial = RefrigeratorReading::with_snapshot(RefrigeratorSnapshot::unregistered(
            "  ", None, None,
        ));
        assert!(matches!(
            validate_reading(&blank_serial),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
