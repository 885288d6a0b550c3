// ==========================================
// 物流管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod facility;
pub mod refrigerator;
pub mod shipment;
pub mod types;

// 重导出核心类型
pub use facility::{Distribution, Facility};
pub use refrigerator::{
    DistributionRefrigerators, Refrigerator, RefrigeratorProblem, RefrigeratorReading,
    RefrigeratorSnapshot,
};
pub use shipment::{Order, ShipmentFileInfo, ShippedLineItem};
pub use types::{DistributionStatus, FunctioningStatus};
