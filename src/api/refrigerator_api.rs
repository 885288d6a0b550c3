// ==========================================
// 物流管理系统 - 冰箱登记 API
// ==========================================
// 职责: 机构冰箱登记与查询
// ==========================================

use std::sync::Arc;

use crate::api::error::{require_positive_id, ApiError, ApiResult};
use crate::domain::refrigerator::Refrigerator;
use crate::repository::directory_repo::FacilityDirectory;
use crate::repository::refrigerator_repo::RefrigeratorRepository;

/// 冰箱登记API
pub struct RefrigeratorApi {
    repo: Arc<RefrigeratorRepository>,
    facilities: Arc<dyn FacilityDirectory>,
}

impl RefrigeratorApi {
    pub fn new(repo: Arc<RefrigeratorRepository>, facilities: Arc<dyn FacilityDirectory>) -> Self {
        Self { repo, facilities }
    }

    /// 登记冰箱
    ///
    /// # 返回
    /// - Ok(Refrigerator): 带生成 id 的冰箱
    /// - Err(ApiError::NotFound): 机构不存在
    /// - Err(ApiError::StorageError): 同一机构下序列号重复
    ///
    /// 序列号去除首尾空白后入库，与 get_by_serial_number 的查询口径一致
    pub fn register(&self, refrigerator: Refrigerator) -> ApiResult<Refrigerator> {
        let serial_number = refrigerator.serial_number.trim().to_string();
        if serial_number.is_empty() {
            return Err(ApiError::InvalidInput("冰箱序列号不能为空".to_string()));
        }
        let refrigerator = Refrigerator {
            serial_number,
            ..refrigerator
        };
        require_positive_id("facilityId", refrigerator.facility_id)?;

        if !self.facilities.facility_exists(refrigerator.facility_id)? {
            return Err(ApiError::NotFound(format!(
                "Facility(id={})不存在",
                refrigerator.facility_id
            )));
        }

        let id = self.repo.insert(&refrigerator)?;
        tracing::info!(
            refrigerator_id = id,
            facility_id = refrigerator.facility_id,
            "冰箱登记完成: {}",
            refrigerator.serial_number
        );
        Ok(refrigerator.with_id(id))
    }

    /// 按 id 查询
    pub fn get_by_id(&self, id: i64) -> ApiResult<Refrigerator> {
        require_positive_id("refrigeratorId", id)?;
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Refrigerator(id={})不存在", id)))
    }

    /// 查询机构下全部冰箱
    pub fn list_by_facility(&self, facility_id: i64) -> ApiResult<Vec<Refrigerator>> {
        require_positive_id("facilityId", facility_id)?;
        Ok(self.repo.find_by_facility_id(facility_id)?)
    }

    /// 按机构 + 序列号查询
    pub fn get_by_serial_number(&self, facility_id: i64, serial_number: &str) -> ApiResult<Refrigerator> {
        require_positive_id("facilityId", facility_id)?;
        self.repo
            .find_by_serial_number(facility_id, serial_number.trim())?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "Refrigerator(facilityId={}, serialNumber={})不存在",
                    facility_id, serial_number
                ))
            })
    }
}
