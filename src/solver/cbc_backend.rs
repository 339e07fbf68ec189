// ==========================================
// 农业种植规划系统 - COIN-OR CBC 求解后端
// ==========================================
// 职责: ModelSpec → good_lp + CBC(feature "cbc"),MILP
// 红线: good_lp 只做最小化,目标系数进入时取负,目标值用原系数重算
// ==========================================

use std::time::Instant;

use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolution, SolverModel, Variable as GoodLpVariable,
};

use crate::engine::model_builder::{ConstraintOp, ModelSpec};
use crate::solver::error::{SolverError, SolverResult};
use crate::solver::{ensure_integer_support, SolveOptions, SolveOutcome, SolveStatus, SolverBackend};

pub struct CbcBackend;

impl CbcBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CbcBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBackend for CbcBackend {
    fn name(&self) -> &'static str {
        "cbc"
    }

    fn supports_integer(&self) -> bool {
        true
    }

    fn solve(&self, model: &ModelSpec, options: &SolveOptions) -> SolverResult<SolveOutcome> {
        ensure_integer_support(self, model)?;
        let start = Instant::now();

        let mut vars = variables!();
        let mut lp_variables: Vec<GoodLpVariable> = Vec::with_capacity(model.num_variables());
        for spec in &model.variables {
            let definition = if spec.integer {
                variable().integer().min(spec.lower).max(spec.upper)
            } else {
                variable().min(spec.lower).max(spec.upper)
            };
            lp_variables.push(vars.add(definition));
        }

        // good_lp 做最小化,最大化目标在这里取负
        let mut objective: Expression = 0.into();
        for (spec, lp_var) in model.variables.iter().zip(lp_variables.iter()) {
            if spec.objective_coefficient != 0.0 {
                objective += -spec.objective_coefficient * *lp_var;
            }
        }

        let mut cbc_model = vars.minimise(objective).using(coin_cbc::coin_cbc);
        if let Some(limit) = options.time_limit {
            cbc_model.set_parameter("seconds", &limit.as_secs().to_string());
        }
        cbc_model.set_parameter("logLevel", if options.verbose { "1" } else { "0" });

        for row in &model.constraints {
            let mut lhs: Expression = 0.into();
            for (index, coefficient) in &row.terms {
                lhs += *coefficient * lp_variables[*index];
            }
            cbc_model = match row.op {
                ConstraintOp::Le => cbc_model.with(lhs.leq(row.rhs)),
                ConstraintOp::Ge => cbc_model.with(lhs.geq(row.rhs)),
                ConstraintOp::Eq => cbc_model.with(lhs.eq(row.rhs)),
            };
        }

        let solution = cbc_model.solve().map_err(|err| match err {
            ResolutionError::Infeasible => SolverError::Infeasible,
            ResolutionError::Unbounded => SolverError::Unbounded,
            other => SolverError::Backend(other.to_string()),
        })?;

        let values: Vec<f64> = lp_variables
            .iter()
            .map(|lp_var| solution.value(*lp_var))
            .collect();
        // 用原始(未取负)系数重算目标值
        let objective_value: f64 = model
            .variables
            .iter()
            .zip(values.iter())
            .map(|(spec, value)| spec.objective_coefficient * value)
            .sum();

        let elapsed = start.elapsed();
        tracing::info!(
            objective = objective_value,
            elapsed_ms = elapsed.as_millis() as u64,
            "CBC 求解完成"
        );
        Ok(SolveOutcome {
            status: SolveStatus::Optimal,
            objective_value,
            values,
            solve_time: elapsed,
            backend: self.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::model_builder::{ConstraintSpec, VarSpec};

    fn var(name: &str, lower: f64, upper: f64, coefficient: f64) -> VarSpec {
        VarSpec {
            name: name.to_string(),
            lower,
            upper,
            integer: false,
            objective_coefficient: coefficient,
        }
    }

    #[test]
    fn test_solves_small_lp_with_negated_objective() {
        let model = ModelSpec {
            variables: vec![var("x", 0.0, 10.0, 2.0), var("y", 0.0, 10.0, 3.0)],
            constraints: vec![ConstraintSpec {
                name: "cap".to_string(),
                terms: vec![(0, 1.0), (1, 1.0)],
                op: ConstraintOp::Le,
                rhs: 12.0,
            }],
            ..Default::default()
        };

        let outcome = CbcBackend::new()
            .solve(&model, &SolveOptions::default())
            .unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        // 目标值必须是最大化口径(重算后为正)
        assert!((outcome.objective_value - 34.0).abs() < 1e-6);
    }

    #[test]
    fn test_solves_binary_milp() {
        let mut a = var("a", 0.0, 1.0, 3.0);
        a.integer = true;
        let mut b = var("b", 0.0, 1.0, 2.0);
        b.integer = true;
        let model = ModelSpec {
            variables: vec![a, b],
            constraints: vec![ConstraintSpec {
                name: "pick_one".to_string(),
                terms: vec![(0, 1.0), (1, 1.0)],
                op: ConstraintOp::Le,
                rhs: 1.0,
            }],
            ..Default::default()
        };

        let outcome = CbcBackend::new()
            .solve(&model, &SolveOptions::default())
            .unwrap();
        assert!((outcome.objective_value - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_reports_infeasible() {
        let model = ModelSpec {
            variables: vec![var("x", 0.0, 10.0, 1.0)],
            constraints: vec![ConstraintSpec {
                name: "floor".to_string(),
                terms: vec![(0, 1.0)],
                op: ConstraintOp::Ge,
                rhs: 20.0,
            }],
            ..Default::default()
        };

        let err = CbcBackend::new()
            .solve(&model, &SolveOptions::default())
            .unwrap_err();
        assert!(matches!(err, SolverError::Infeasible));
    }
}
