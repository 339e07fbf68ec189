// ==========================================
// 农业种植规划系统 - microlp 求解后端
// ==========================================
// 职责: ModelSpec → microlp(纯 Rust 单纯形法),默认后端
// 红线: 整数变量仅支持 0/1;不支持求解时限
// ==========================================

use std::time::Instant;

use microlp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};

use crate::engine::model_builder::{ConstraintOp, ModelSpec};
use crate::solver::error::{SolverError, SolverResult};
use crate::solver::{ensure_integer_support, SolveOptions, SolveOutcome, SolveStatus, SolverBackend};

pub struct MicrolpBackend;

impl MicrolpBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicrolpBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBackend for MicrolpBackend {
    fn name(&self) -> &'static str {
        "microlp"
    }

    /// 支持整数变量,但仅限 0/1(本系统的选择变量都是 0/1)
    fn supports_integer(&self) -> bool {
        true
    }

    fn solve(&self, model: &ModelSpec, options: &SolveOptions) -> SolverResult<SolveOutcome> {
        ensure_integer_support(self, model)?;
        if options.time_limit.is_some() {
            tracing::debug!("microlp 后端不支持求解时限,忽略 time_limit");
        }

        let start = Instant::now();
        let mut problem = Problem::new(OptimizationDirection::Maximize);

        let mut vars = Vec::with_capacity(model.num_variables());
        for spec in &model.variables {
            let var = if spec.integer {
                if spec.lower == 0.0 && spec.upper == 1.0 {
                    problem.add_binary_var(spec.objective_coefficient)
                } else {
                    return Err(SolverError::UnsupportedModel(format!(
                        "microlp 后端仅支持 0/1 整数变量,变量 {} 的范围是 [{}, {}]",
                        spec.name, spec.lower, spec.upper
                    )));
                }
            } else {
                problem.add_var(spec.objective_coefficient, (spec.lower, spec.upper))
            };
            vars.push(var);
        }

        for row in &model.constraints {
            let mut expr = LinearExpr::empty();
            for (index, coefficient) in &row.terms {
                expr.add(vars[*index], *coefficient);
            }
            let op = match row.op {
                ConstraintOp::Le => ComparisonOp::Le,
                ConstraintOp::Ge => ComparisonOp::Ge,
                ConstraintOp::Eq => ComparisonOp::Eq,
            };
            problem.add_constraint(expr, op, row.rhs);
        }

        let solution = problem.solve().map_err(|err| match err {
            microlp::Error::Infeasible => SolverError::Infeasible,
            microlp::Error::Unbounded => SolverError::Unbounded,
            microlp::Error::InternalError(message) => SolverError::Backend(message),
        })?;

        let values: Vec<f64> = vars.iter().map(|var| solution[*var]).collect();
        let outcome = SolveOutcome {
            status: SolveStatus::Optimal,
            objective_value: solution.objective(),
            values,
            solve_time: start.elapsed(),
            backend: self.name().to_string(),
        };
        tracing::info!(
            objective = outcome.objective_value,
            elapsed_ms = outcome.solve_time.as_millis() as u64,
            "microlp 求解完成"
        );
        Ok(outcome)
    }
}
