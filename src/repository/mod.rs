// ==========================================
// 物流管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod directory_repo;
pub mod distribution_refrigerators_repo;
pub mod error;
pub mod order_repo;
pub mod refrigerator_repo;
pub mod shipment_repo;

// 重导出核心仓储
pub use directory_repo::{
    DistributionDirectory, DistributionRepository, FacilityDirectory, FacilityRepository,
};
pub use distribution_refrigerators_repo::DistributionRefrigeratorsRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use order_repo::{OrderRepository, OrderTracking};
pub use refrigerator_repo::RefrigeratorRepository;
pub use shipment_repo::ShipmentRepository;
