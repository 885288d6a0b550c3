// ==========================================
// 物流管理系统 - 核心库
// ==========================================
// 范围: 配送冷链设备巡检数据 (冰箱/读数/故障) 与发运数据的持久化
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建库）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    Distribution, DistributionRefrigerators, DistributionStatus, Facility, FunctioningStatus,
    Order, Refrigerator, RefrigeratorProblem, RefrigeratorReading, RefrigeratorSnapshot,
    ShipmentFileInfo, ShippedLineItem,
};

// API
pub use api::{ApiError, ApiResult, DistributionRefrigeratorsApi, RefrigeratorApi, ShipmentApi};

// 应用状态
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "物流管理系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
