// ==========================================
// 农业种植规划系统 - 领域模型错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("作物数据无效 ({name}): {message}")]
    InvalidCrop { name: String, message: String },

    #[error("地块数据无效 ({id}): {message}")]
    InvalidParcel { id: String, message: String },

    #[error("资源约束无效: {0}")]
    InvalidLimits(String),

    #[error("目标权重无效: {0}")]
    InvalidWeights(String),

    #[error("规划问题无效: {0}")]
    InvalidProblem(String),
}

/// Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
