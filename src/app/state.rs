// ==========================================
// 物流管理系统 - 应用状态
// ==========================================
// 职责: 显式构造所有仓储与API实例（替代注解式依赖注入）
// 所有仓储共享同一个数据库连接
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{DistributionRefrigeratorsApi, RefrigeratorApi, ShipmentApi};
use crate::config::AppConfig;
use crate::db::{
    configure_sqlite_connection_with_timeout, ensure_db_parent_dir, init_schema,
    read_schema_version,
};
use crate::repository::{
    DistributionRefrigeratorsRepository, DistributionRepository, FacilityRepository,
    OrderRepository, RefrigeratorRepository, ShipmentRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 共享连接
    pub conn: Arc<Mutex<Connection>>,

    /// 配送冰箱巡检API
    pub distribution_refrigerators_api: Arc<DistributionRefrigeratorsApi>,

    /// 冰箱登记API
    pub refrigerator_api: Arc<RefrigeratorApi>,

    /// 发运API
    pub shipment_api: Arc<ShipmentApi>,

    /// 机构仓储（目录数据维护）
    pub facility_repo: Arc<FacilityRepository>,

    /// 配送仓储（目录数据维护）
    pub distribution_repo: Arc<DistributionRepository>,

    /// 订单仓储（订单跟踪协作方）
    pub order_repo: Arc<OrderRepository>,
}

impl AppState {
    /// 按配置打开数据库并创建AppState
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 创建数据库目录（如不存在），打开数据库并应用统一 PRAGMA
    /// 2. 初始化 schema（幂等）
    /// 3. 初始化所有Repository与API
    pub fn new(config: &AppConfig) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", config.db_path);

        ensure_db_parent_dir(&config.db_path)
            .map_err(|e| format!("无法创建数据库目录: {}", e))?;
        let conn = Connection::open(&config.db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        configure_sqlite_connection_with_timeout(&conn, config.busy_timeout_ms)
            .map_err(|e| format!("数据库连接配置失败: {}", e))?;

        Self::from_connection(config.db_path.clone(), conn)
    }

    /// 从已打开的连接创建AppState（测试可传入内存库）
    pub fn from_connection(db_path: String, conn: Connection) -> Result<Self, String> {
        // foreign_keys 为连接级设置，重复开启幂等
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| format!("数据库连接配置失败: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let facility_repo = Arc::new(FacilityRepository::new(conn.clone()));
        let distribution_repo = Arc::new(DistributionRepository::new(conn.clone()));
        let refrigerator_repo = Arc::new(RefrigeratorRepository::new(conn.clone()));
        let distribution_refrigerators_repo =
            Arc::new(DistributionRefrigeratorsRepository::new(conn.clone()));
        let shipment_repo = Arc::new(ShipmentRepository::new(conn.clone()));
        let order_repo = Arc::new(OrderRepository::new(conn.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let distribution_refrigerators_api = Arc::new(DistributionRefrigeratorsApi::new(
            distribution_refrigerators_repo,
            facility_repo.clone(),
            distribution_repo.clone(),
        ));
        let refrigerator_api = Arc::new(RefrigeratorApi::new(
            refrigerator_repo,
            facility_repo.clone(),
        ));
        let shipment_api = Arc::new(ShipmentApi::new(shipment_repo, order_repo.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            conn,
            distribution_refrigerators_api,
            refrigerator_api,
            shipment_api,
            facility_repo,
            distribution_repo,
            order_repo,
        })
    }

    /// 当前数据库 schema 版本
    pub fn schema_version(&self) -> Result<Option<i64>, String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;
        read_schema_version(&conn).map_err(|e| format!("读取 schema_version 失败: {}", e))
    }
}
