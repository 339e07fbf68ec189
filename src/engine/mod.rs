// ==========================================
// 农业种植规划系统 - 引擎层
// ==========================================
// 职责: 问题校验、规划模型装配、解提取与 KPI 计算
// 红线: 引擎不调用求解器,不做 IO;所有校验结论必须带 message
// ==========================================

pub mod model_builder;
pub mod solution;
pub mod validator;

// 重导出核心引擎
pub use model_builder::{
    AllocationVar, ConstraintOp, ConstraintSpec, ModelBuilder, ModelError, ModelResult,
    ModelSpec, SelectionVar, VarSpec,
};
pub use solution::{
    Allocation, AllocationPlan, CropShare, CropSummary, Kpis, ParcelShare, ParcelSummary,
    PlanTotals, ResourceUsage, SolutionExtractor, DEFAULT_ALLOCATION_EPSILON,
};
pub use validator::{ProblemValidator, ValidationReport};
