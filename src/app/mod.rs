// ==========================================
// 物流管理系统 - 应用层
// ==========================================
// 职责: 组装仓储与API，供上游编排层使用
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
