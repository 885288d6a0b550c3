// ==========================================
// 物流管理系统 - 冷链设备领域模型
// ==========================================
// 聚合: DistributionRefrigerators (聚合根)
//   └─ RefrigeratorReading (读数，含冰箱信息快照)
//        └─ RefrigeratorProblem (故障标记，可选)
// 写入顺序: 聚合根 → 读数 → 故障 (后者依赖前者生成的 id)
// ==========================================

use crate::domain::types::FunctioningStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Refrigerator - 冰箱登记
// ==========================================
// 约束: 序列号在同一机构内唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refrigerator {
    pub id: Option<i64>,
    pub serial_number: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub facility_id: i64,

    // ===== 审计字段 =====
    pub created_by: Option<i64>,
    pub modified_by: Option<i64>,
    pub created_date: Option<NaiveDateTime>,
    pub modified_date: Option<NaiveDateTime>,
}

impl Refrigerator {
    /// 创建新的冰箱登记
    ///
    /// # 参数
    /// - `serial_number`: 序列号
    /// - `brand`: 品牌
    /// - `model`: 型号
    /// - `facility_id`: 所属机构
    pub fn new(
        serial_number: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        facility_id: i64,
    ) -> Self {
        Self {
            id: None,
            serial_number: serial_number.into(),
            brand: Some(brand.into()),
            model: Some(model.into()),
            facility_id,
            created_by: None,
            modified_by: None,
            created_date: None,
            modified_date: None,
        }
    }

    /// 设置创建人/修改人
    pub fn with_audit(mut self, user_id: i64) -> Self {
        self.created_by = Some(user_id);
        self.modified_by = Some(user_id);
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// 生成读数所需的冰箱信息快照
    pub fn snapshot(&self) -> RefrigeratorSnapshot {
        RefrigeratorSnapshot {
            refrigerator_id: self.id,
            serial_number: self.serial_number.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
        }
    }
}

// ==========================================
// RefrigeratorSnapshot - 冰箱信息快照
// ==========================================
// 写入读数时反范式保存；冰箱后续改名不影响已保存的读数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefrigeratorSnapshot {
    /// 已登记冰箱的 id；临时/未登记设备为 None
    pub refrigerator_id: Option<i64>,
    pub serial_number: String,
    pub brand: Option<String>,
    pub model: Option<String>,
}

impl RefrigeratorSnapshot {
    /// 未登记设备的快照
    pub fn unregistered(
        serial_number: impl Into<String>,
        brand: Option<String>,
        model: Option<String>,
    ) -> Self {
        Self {
            refrigerator_id: None,
            serial_number: serial_number.into(),
            brand,
            model,
        }
    }
}

// ==========================================
// RefrigeratorReading - 冰箱读数
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RefrigeratorReading {
    pub id: Option<i64>,
    /// 所属聚合根 id（聚合根写入后回填）
    pub distribution_refrigerators_id: Option<i64>,
    pub refrigerator: Option<RefrigeratorSnapshot>,

    pub temperature: Option<f64>,
    pub functioning_correctly: Option<FunctioningStatus>,
    pub low_alarm_events: Option<i32>,
    pub high_alarm_events: Option<i32>,
    pub problem_since_last_time: Option<FunctioningStatus>,
    pub notes: Option<String>,

    /// 预先挂载的故障报告（读数写入后再单独写入）
    pub problem: Option<RefrigeratorProblem>,
}

impl RefrigeratorReading {
    /// 针对已登记冰箱的读数
    pub fn for_refrigerator(refrigerator: &Refrigerator) -> Self {
        Self {
            refrigerator: Some(refrigerator.snapshot()),
            ..Self::default()
        }
    }

    /// 针对任意冰箱快照的读数
    pub fn with_snapshot(snapshot: RefrigeratorSnapshot) -> Self {
        Self {
            refrigerator: Some(snapshot),
            ..Self::default()
        }
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn functioning_correctly(mut self, status: FunctioningStatus) -> Self {
        self.functioning_correctly = Some(status);
        self
    }

    pub fn alarm_events(mut self, low: i32, high: i32) -> Self {
        self.low_alarm_events = Some(low);
        self.high_alarm_events = Some(high);
        self
    }

    pub fn problem_since_last_time(mut self, status: FunctioningStatus) -> Self {
        self.problem_since_last_time = Some(status);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn problem(mut self, problem: RefrigeratorProblem) -> Self {
        self.problem = Some(problem);
        self
    }

    /// 回填聚合根 id
    pub fn with_distribution_refrigerators_id(mut self, id: i64) -> Self {
        self.distribution_refrigerators_id = Some(id);
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

// ==========================================
// RefrigeratorProblem - 冰箱故障报告
// ==========================================
// 六个故障标记相互独立；与 functioning_correctly 的一致性由调用方负责
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RefrigeratorProblem {
    pub id: Option<i64>,
    /// 所属读数 id（读数写入后回填）
    pub reading_id: Option<i64>,

    pub operator_error: bool,
    pub burner_problem: bool,
    pub gas_leakage: bool,
    pub egp_fault: bool,
    pub thermostat_setting: bool,
    pub other: bool,
    pub notes: Option<String>,
}

impl RefrigeratorProblem {
    /// 创建故障报告
    ///
    /// 标记顺序: 操作失误、燃烧器故障、燃气泄漏、EGP 故障、温控设置、其他
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reading_id: Option<i64>,
        operator_error: bool,
        burner_problem: bool,
        gas_leakage: bool,
        egp_fault: bool,
        thermostat_setting: bool,
        other: bool,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: None,
            reading_id,
            operator_error,
            burner_problem,
            gas_leakage,
            egp_fault,
            thermostat_setting,
            other,
            notes,
        }
    }

    /// 回填读数 id
    pub fn with_reading_id(mut self, reading_id: i64) -> Self {
        self.reading_id = Some(reading_id);
        self
    }

    /// 是否存在任一故障标记
    pub fn has_any_fault(&self) -> bool {
        self.operator_error
            || self.burner_problem
            || self.gas_leakage
            || self.egp_fault
            || self.thermostat_setting
            || self.other
    }
}

// ==========================================
// DistributionRefrigerators - 配送冰箱聚合根
// ==========================================
// 约束: (facility_id, distribution_id) 唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRefrigerators {
    pub id: Option<i64>,
    pub facility_id: i64,
    pub distribution_id: i64,
    pub readings: Vec<RefrigeratorReading>,
}

impl DistributionRefrigerators {
    pub fn new(facility_id: i64, distribution_id: i64, readings: Vec<RefrigeratorReading>) -> Self {
        Self {
            id: None,
            facility_id,
            distribution_id,
            readings,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
