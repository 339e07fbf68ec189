// ==========================================
// 农业种植规划系统 - HiGHS 求解后端
// ==========================================
// 职责: ModelSpec → HiGHS(feature "highs"),面向大规模 LP/MILP
// 红线: 时限内无可行解必须报 NoSolution,不允许返回空解
// ==========================================

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use highs::{HighsModelStatus, RowProblem, Sense};

use crate::engine::model_builder::{ConstraintOp, ModelSpec};
use crate::solver::error::{SolverError, SolverResult};
use crate::solver::{ensure_integer_support, SolveOptions, SolveOutcome, SolveStatus, SolverBackend};

pub struct HighsBackend;

impl HighsBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBackend for HighsBackend {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn supports_integer(&self) -> bool {
        true
    }

    fn solve(&self, model: &ModelSpec, options: &SolveOptions) -> SolverResult<SolveOutcome> {
        ensure_integer_support(self, model)?;
        let start = Instant::now();

        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(model.num_variables());
        for spec in &model.variables {
            let col = if spec.integer {
                pb.add_integer_column(spec.objective_coefficient, spec.lower..=spec.upper)
            } else {
                pb.add_column(spec.objective_coefficient, spec.lower..=spec.upper)
            };
            cols.push(col);
        }

        for row in &model.constraints {
            let terms: Vec<(highs::Col, f64)> = row
                .terms
                .iter()
                .map(|(index, coefficient)| (cols[*index], *coefficient))
                .collect();
            match row.op {
                ConstraintOp::Le => pb.add_row(..=row.rhs, &terms),
                ConstraintOp::Ge => pb.add_row(row.rhs.., &terms),
                ConstraintOp::Eq => pb.add_row(row.rhs..=row.rhs, &terms),
            }
        }

        let mut highs_model = pb.optimise(Sense::Maximise);
        if let Some(limit) = options.time_limit {
            highs_model.set_option("time_limit", limit.as_secs_f64());
        }
        highs_model.set_option("output_flag", options.verbose);

        let solved = highs_model.solve();
        let status = solved.status();
        let elapsed = start.elapsed();

        match status {
            HighsModelStatus::Optimal => {
                let values = solved.get_solution().columns().to_vec();
                let objective_value = recompute_objective(model, &values);
                tracing::info!(
                    objective = objective_value,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "HiGHS 求解完成"
                );
                Ok(SolveOutcome {
                    status: SolveStatus::Optimal,
                    objective_value,
                    values,
                    solve_time: elapsed,
                    backend: self.name().to_string(),
                })
            }
            HighsModelStatus::Infeasible => Err(SolverError::Infeasible),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Err(SolverError::Unbounded)
            }
            HighsModelStatus::ReachedTimeLimit => {
                // 时限到达时可能带有当前最好的可行解
                let incumbent = catch_unwind(AssertUnwindSafe(|| solved.get_solution()))
                    .ok()
                    .map(|solution| solution.columns().to_vec())
                    .filter(|values| {
                        values.len() == model.num_variables()
                            && values.iter().all(|v| v.is_finite())
                    });
                match incumbent {
                    Some(values) => {
                        let objective_value = recompute_objective(model, &values);
                        tracing::warn!(
                            objective = objective_value,
                            "HiGHS 达到求解时限,返回当前最好可行解"
                        );
                        Ok(SolveOutcome {
                            status: SolveStatus::TimeLimit,
                            objective_value,
                            values,
                            solve_time: elapsed,
                            backend: self.name().to_string(),
                        })
                    }
                    None => Err(SolverError::NoSolution("达到求解时限且无可行解".to_string())),
                }
            }
            other => Err(SolverError::Backend(format!("HiGHS 返回状态: {:?}", other))),
        }
    }
}

fn recompute_objective(model: &ModelSpec, values: &[f64]) -> f64 {
    model
        .variables
        .iter()
        .zip(values.iter())
        .map(|(spec, value)| spec.objective_coefficient * value)
        .sum()
}
