// ==========================================
// 物流管理系统 - 机构 / 配送 领域模型
// ==========================================
// 说明: 机构与配送由外部目录维护，这里只保留持久化与校验所需字段
// ==========================================

use crate::domain::types::DistributionStatus;
use serde::{Deserialize, Serialize};

/// 机构（诊所等参与配送的站点）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: Option<i64>,
    pub code: String,
    pub name: String,
    pub active: bool,
}

impl Facility {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            active: true,
        }
    }
}

/// 配送事件（配送区域 + 项目 + 周期）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub id: Option<i64>,
    pub delivery_zone_id: i64,
    pub program_id: i64,
    pub period_id: i64,
    pub status: DistributionStatus,
    pub created_by: Option<i64>,
    pub modified_by: Option<i64>,
}

impl Distribution {
    /// 创建处于 INITIATED 状态的配送
    pub fn initiated(delivery_zone_id: i64, program_id: i64, period_id: i64) -> Self {
        Self {
            id: None,
            delivery_zone_id,
            program_id,
            period_id,
            status: DistributionStatus::Initiated,
            created_by: None,
            modified_by: None,
        }
    }

    pub fn with_audit(mut self, user_id: i64) -> Self {
        self.created_by = Some(user_id);
        self.modified_by = Some(user_id);
        self
    }
}
