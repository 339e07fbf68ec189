// ==========================================
// 农业种植规划系统 - 核心库
// ==========================================
// 技术栈: Rust + 可插拔 LP/MILP 求解后端
// 系统定位: 教学项目,组合优化本身交给第三方求解库
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 校验/建模/解提取
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 求解器层 - 后端适配
pub mod solver;

// 报告层 - 文本报告与导出
pub mod report;

// 配置层 - 运行配置
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 异步求解外壳
pub mod app;

// 内置教学场景
pub mod scenario;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Season, SoilType};

// 领域实体
pub use domain::{Crop, LandParcel, PlanningProblem, ResourceLimits};

// 引擎
pub use engine::{
    AllocationPlan, Kpis, ModelBuilder, ModelSpec, ProblemValidator, SolutionExtractor,
    ValidationReport,
};

// 求解器
pub use solver::{
    available_backends, solver_factory, SolveOptions, SolveOutcome, SolveStatus, SolverBackend,
};

// API
pub use api::{ApiError, PlanningApi, SolveReport};

// 应用层
pub use app::{SolveEvent, SolveHandle, SolveStage, SolveWorker};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "农业种植规划系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
