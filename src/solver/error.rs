// ==========================================
// 农业种植规划系统 - 求解器层错误类型
// ==========================================
// 职责: 统一三个后端的失败口径
// 红线: 不可行/无界是业务结论,必须与库内部错误分开
// ==========================================

use thiserror::Error;

/// 求解器层错误类型
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("问题不可行: 约束之间相互冲突,不存在满足全部约束的方案")]
    Infeasible,

    #[error("问题无界: 目标可以无限改进,请检查约束是否缺失")]
    Unbounded,

    #[error("求解中止且无可用解: {0}")]
    NoSolution(String),

    #[error("后端不支持该模型: {0}")]
    UnsupportedModel(String),

    #[error("求解器内部错误: {0}")]
    Backend(String),

    #[error("未知的求解后端: {0}")]
    UnknownBackend(String),
}

/// Result 类型别名
pub type SolverResult<T> = Result<T, SolverError>;
