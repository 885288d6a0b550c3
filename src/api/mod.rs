// ==========================================
// 物流管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供上游编排层调用
// ==========================================

pub mod distribution_refrigerators_api;
pub mod error;
pub mod refrigerator_api;
pub mod shipment_api;

// 重导出核心类型
pub use distribution_refrigerators_api::DistributionRefrigeratorsApi;
pub use error::{ApiError, ApiResult};
pub use refrigerator_api::RefrigeratorApi;
pub use shipment_api::ShipmentApi;
