// ==========================================
// 农业种植规划系统 - API层错误类型
// ==========================================
// 职责: 汇聚各层错误,给前端稳定的错误码与可解释的消息
// 红线: 不可行/无界必须与普通求解失败分开,前端提示文案不同
// ==========================================

use thiserror::Error;

use crate::domain::error::DomainError;
use crate::engine::model_builder::ModelError;
use crate::importer::error::ImportError;
use crate::report::error::ReportError;
use crate::solver::error::SolverError;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 求解前错误
    // ==========================================
    #[error("问题校验未通过: {0}")]
    ValidationFailed(String),

    #[error("模型构建失败: {0}")]
    ModelBuildFailed(String),

    #[error("数据导入失败: {0}")]
    ImportFailed(String),

    // ==========================================
    // 求解错误
    // ==========================================
    #[error("{0}")]
    SolverInfeasible(String),

    #[error("{0}")]
    SolverUnbounded(String),

    #[error("求解失败: {0}")]
    SolverFailed(String),

    // ==========================================
    // 输出与通用错误
    // ==========================================
    #[error("文件读写失败: {0}")]
    IoFailed(String),

    /// 用户主动取消,与内部故障分开上报
    #[error("已取消")]
    Cancelled,

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定错误码,供前端映射提示文案
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ValidationFailed(_) => "VALIDATION_FAILED",
            ApiError::ModelBuildFailed(_) => "MODEL_BUILD_FAILED",
            ApiError::ImportFailed(_) => "IMPORT_FAILED",
            ApiError::SolverInfeasible(_) => "SOLVER_INFEASIBLE",
            ApiError::SolverUnbounded(_) => "SOLVER_UNBOUNDED",
            ApiError::SolverFailed(_) => "SOLVER_FAILED",
            ApiError::IoFailed(_) => "IO_FAILED",
            ApiError::Cancelled => "CANCELLED",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL",
        }
    }
}

// ==========================================
// 各层错误转换
// ==========================================

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::ValidationFailed(err.to_string())
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            // 领域校验失败在建模入口被发现时仍按校验错误上报
            ModelError::InvalidProblem(domain_err) => {
                ApiError::ValidationFailed(domain_err.to_string())
            }
            other => ApiError::ModelBuildFailed(other.to_string()),
        }
    }
}

impl From<SolverError> for ApiError {
    fn from(err: SolverError) -> Self {
        let message = err.to_string();
        match err {
            SolverError::Infeasible => ApiError::SolverInfeasible(message),
            SolverError::Unbounded => ApiError::SolverUnbounded(message),
            _ => ApiError::SolverFailed(message),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportFailed(err.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::IoFailed(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_error_codes() {
        assert_eq!(
            ApiError::ValidationFailed("x".to_string()).code(),
            "VALIDATION_FAILED"
        );
        assert_eq!(
            ApiError::SolverInfeasible("x".to_string()).code(),
            "SOLVER_INFEASIBLE"
        );
        assert_eq!(ApiError::IoFailed("x".to_string()).code(), "IO_FAILED");
        assert_eq!(ApiError::Cancelled.code(), "CANCELLED");
        assert_eq!(ApiError::Cancelled.to_string(), "已取消");
    }

    #[test]
    fn test_solver_error_conversion_keeps_business_outcome() {
        let api_err: ApiError = SolverError::Infeasible.into();
        assert!(matches!(api_err, ApiError::SolverInfeasible(_)));
        assert!(api_err.to_string().contains("不可行"));

        let api_err: ApiError = SolverError::Unbounded.into();
        assert!(matches!(api_err, ApiError::SolverUnbounded(_)));

        let api_err: ApiError = SolverError::Backend("boom".to_string()).into();
        assert_eq!(api_err.code(), "SOLVER_FAILED");
    }

    #[test]
    fn test_model_error_conversion() {
        let api_err: ApiError = ModelError::NoDecisionVariables.into();
        assert_eq!(api_err.code(), "MODEL_BUILD_FAILED");
    }
}
