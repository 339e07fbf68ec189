// ==========================================
// 农业种植规划系统 - API 层
// ==========================================
// 职责: 提供规划业务 API 接口,供 CLI 与上层界面调用
// ==========================================

pub mod error;
pub mod planning_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use planning_api::{PlanningApi, SolveReport};
