// ==========================================
// 农业种植规划系统 - 求解器层
// ==========================================
// 职责: 可插拔求解后端;组合求解在第三方求解库内部完成
// 红线: 本层不修改模型语义,只做 ModelSpec → 求解库 API 的翻译
// ==========================================
// 后端:
//   microlp - 纯 Rust,默认编译,支持 0/1 整数变量
//   highs   - feature "highs",大规模 LP/MILP
//   cbc     - feature "cbc"(good_lp + COIN-OR CBC),MILP
// ==========================================

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::model_builder::ModelSpec;

pub mod error;
pub mod microlp_backend;

#[cfg(feature = "cbc")]
pub mod cbc_backend;
#[cfg(feature = "highs")]
pub mod highs_backend;

pub use error::{SolverError, SolverResult};
pub use microlp_backend::MicrolpBackend;

#[cfg(feature = "cbc")]
pub use cbc_backend::CbcBackend;
#[cfg(feature = "highs")]
pub use highs_backend::HighsBackend;

/// 求解终止状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// 已证明最优
    Optimal,
    Infeasible,
    Unbounded,
    /// 达到时限,返回当前最好的可行解
    TimeLimit,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::TimeLimit => "time_limit",
        };
        write!(f, "{}", label)
    }
}

/// 求解选项
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// 求解时限;microlp 后端不支持时限,此项被忽略
    pub time_limit: Option<Duration>,
    /// 是否打开求解库自身的日志输出
    pub verbose: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            time_limit: Some(Duration::from_secs(300)),
            verbose: false,
        }
    }
}

/// 求解结果: 变量值按 ModelSpec::variables 的顺序排列
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub objective_value: f64,
    pub values: Vec<f64>,
    pub solve_time: Duration,
    pub backend: String,
}

/// 求解后端接口
pub trait SolverBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// 后端是否支持整数变量
    fn supports_integer(&self) -> bool;

    /// 求解模型
    ///
    /// # 返回
    /// - Ok(SolveOutcome): 拿到可用解(最优或时限内最好解)
    /// - Err(SolverError): 不可行/无界/后端失败
    fn solve(&self, model: &ModelSpec, options: &SolveOptions) -> SolverResult<SolveOutcome>;
}

impl std::fmt::Debug for dyn SolverBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SolverBackend({})", self.name())
    }
}

/// 按名称创建求解后端
///
/// # 参数
/// - name: "microlp" / "highs" / "cbc",不区分大小写
pub fn solver_factory(name: &str) -> SolverResult<Arc<dyn SolverBackend>> {
    match name.trim().to_lowercase().as_str() {
        "microlp" => Ok(Arc::new(MicrolpBackend::new())),
        #[cfg(feature = "highs")]
        "highs" => Ok(Arc::new(HighsBackend::new())),
        #[cfg(feature = "cbc")]
        "cbc" => Ok(Arc::new(CbcBackend::new())),
        other => Err(SolverError::UnknownBackend(other.to_string())),
    }
}

/// 当前编译产物中可用的后端名称
pub fn available_backends() -> Vec<&'static str> {
    let mut backends = vec!["microlp"];
    if cfg!(feature = "highs") {
        backends.push("highs");
    }
    if cfg!(feature = "cbc") {
        backends.push("cbc");
    }
    backends
}

/// 整数模型与后端能力的前置检查,各后端在翻译前调用
pub(crate) fn ensure_integer_support(
    backend: &dyn SolverBackend,
    model: &ModelSpec,
) -> SolverResult<()> {
    if model.has_integer_variables() && !backend.supports_integer() {
        return Err(SolverError::UnsupportedModel(format!(
            "后端 {} 不支持整数变量",
            backend.name()
        )));
    }
    Ok(())
}
