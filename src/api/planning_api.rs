// ==========================================
// 农业种植规划系统 - 规划 API
// ==========================================
// 职责:
// - 对外统一入口: 校验 → 建模 → 求解 → 解提取的完整管线
// - 后端可插拔,默认 microlp
// 说明:
// - 本层为同步接口;需要进度事件的调用方走 app::worker
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::ApiError;
use crate::config::PlannerConfig;
use crate::domain::problem::PlanningProblem;
use crate::engine::model_builder::{ModelBuilder, ModelSpec};
use crate::engine::solution::{AllocationPlan, SolutionExtractor, DEFAULT_ALLOCATION_EPSILON};
use crate::engine::validator::{ProblemValidator, ValidationReport};
use crate::perf::PerfGuard;
use crate::solver::{solver_factory, MicrolpBackend, SolveOptions, SolverBackend};

/// 一次完整求解的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    pub plan: AllocationPlan,
    /// 校验阶段产生的警告(不阻断求解)
    pub warnings: Vec<String>,
    pub variables: usize,
    pub constraints: usize,
}

// ==========================================
// PlanningApi - 规划门面
// ==========================================
pub struct PlanningApi {
    backend: Arc<dyn SolverBackend>,
    allocation_epsilon: f64,
}

impl PlanningApi {
    /// 使用默认后端(microlp)创建
    pub fn new() -> Self {
        Self {
            backend: Arc::new(MicrolpBackend::new()),
            allocation_epsilon: DEFAULT_ALLOCATION_EPSILON,
        }
    }

    /// 使用指定后端创建
    pub fn with_backend(backend: Arc<dyn SolverBackend>) -> Self {
        Self {
            backend,
            allocation_epsilon: DEFAULT_ALLOCATION_EPSILON,
        }
    }

    /// 按运行配置创建(后端名 + 噪声阈值)
    ///
    /// # 返回
    /// - Err(ApiError::SolverFailed): 配置的后端未编译进当前产物
    pub fn from_config(config: &PlannerConfig) -> ApiResult<Self> {
        let backend = solver_factory(&config.default_backend)?;
        Ok(Self {
            backend,
            allocation_epsilon: config.allocation_epsilon,
        })
    }

    /// 当前后端名称
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// 校验规划问题,不建模不求解
    pub fn validate(&self, problem: &PlanningProblem) -> ValidationReport {
        ProblemValidator::new().validate(problem)
    }

    /// 校验并构建规划模型
    ///
    /// # 返回
    /// - Err(ApiError::ValidationFailed): 校验存在错误
    /// - Err(ApiError::ModelBuildFailed): 问题数据无法构成有效模型
    pub fn build(&self, problem: &PlanningProblem) -> ApiResult<ModelSpec> {
        let report = self.validate(problem);
        if !report.is_valid() {
            return Err(ApiError::ValidationFailed(report.errors.join("; ")));
        }
        Ok(ModelBuilder::new().build(problem)?)
    }

    /// 完整求解管线: 校验 → 建模 → 求解 → 解提取
    ///
    /// # 参数
    /// - problem: 规划问题
    /// - options: 求解选项(时限/日志)
    ///
    /// # 返回
    /// - Ok(SolveReport): 方案 + 校验警告 + 模型规模
    /// - Err(ApiError): 见各错误码
    pub fn solve(&self, problem: &PlanningProblem, options: &SolveOptions) -> ApiResult<SolveReport> {
        let _perf = PerfGuard::new("solve_pipeline");

        let report = self.validate(problem);
        if !report.is_valid() {
            tracing::warn!(errors = report.errors.len(), "问题校验未通过,终止求解");
            return Err(ApiError::ValidationFailed(report.errors.join("; ")));
        }
        for warning in &report.warnings {
            tracing::warn!("校验警告: {}", warning);
        }

        let model = ModelBuilder::new().build(problem)?;
        let outcome = self.backend.solve(&model, options)?;
        let plan =
            SolutionExtractor::with_epsilon(self.allocation_epsilon).extract(problem, &model, &outcome);

        tracing::info!(
            backend = self.backend.name(),
            status = %plan.status,
            objective = plan.objective_value,
            "求解管线完成"
        );
        Ok(SolveReport {
            variables: model.num_variables(),
            constraints: model.num_constraints(),
            plan,
            warnings: report.warnings,
        })
    }
}

impl Default for PlanningApi {
    fn default() -> Self {
        Self::new()
    }
}
