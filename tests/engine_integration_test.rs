// ==========================================
// 引擎层集成测试
// ==========================================
// 覆盖: 校验 → 建模 → 求解 → 解提取的逐级衔接,
//       验证最终方案满足模型里的每一条约束
// ==========================================


use agri_plan::engine::model_builder::ConstraintOp;
use agri_plan::engine::{ModelBuilder, ProblemValidator, SolutionExtractor};
use agri_plan::solver::{solver_factory, SolveOptions};
use agri_plan::{scenario, ModelSpec};

/// 逐行核对解是否满足模型的全部约束
fn assert_solution_feasible(model: &ModelSpec, values: &[f64], tolerance: f64) {
    for constraint in &model.constraints {
        let lhs: f64 = constraint
            .terms
            .iter()
            .map(|(index, coefficient)| values[*index] * coefficient)
            .sum();
        let ok = match constraint.op {
            ConstraintOp::Le => lhs <= constraint.rhs + tolerance,
            ConstraintOp::Ge => lhs >= constraint.rhs - tolerance,
            ConstraintOp::Eq => (lhs - constraint.rhs).abs() <= tolerance,
        };
        assert!(
            ok,
            "约束 {} 不满足: lhs={:.4}, rhs={:.4}",
            constraint.name, lhs, constraint.rhs
        );
    }
}

#[test]
fn test_pipeline_stages_compose() {
    let problem = scenario::basic();

    let report = ProblemValidator::new().validate(&problem);
    assert!(report.is_valid(), "errors: {:?}", report.errors);

    let model = ModelBuilder::new().build(&problem).unwrap();
    // Wheat→P1, Corn→P1/P2, Tomato→P1
    assert_eq!(model.num_variables(), 4);

    let backend = solver_factory("microlp").unwrap();
    let outcome = backend.solve(&model, &SolveOptions::default()).unwrap();
    assert_solution_feasible(&model, &outcome.values, 1e-6);

    let plan = SolutionExtractor::new().extract(&problem, &model, &outcome);
    assert!(!plan.allocations.is_empty());
    assert!(plan.kpis.total_profit > 0.0);
    assert!(plan.kpis.land_utilization_pct <= 100.0 + 1e-9);
}

#[test]
fn test_solution_respects_resource_limits() {
    for name in scenario::names() {
        let problem = scenario::by_name(name).unwrap();
        let model = ModelBuilder::new().build(&problem).unwrap();
        let backend = solver_factory("microlp").unwrap();
        let outcome = backend.solve(&model, &SolveOptions::default()).unwrap();

        assert_solution_feasible(&model, &outcome.values, 1e-6);

        let plan = SolutionExtractor::new().extract(&problem, &model, &outcome);
        let limits = &problem.limits;
        assert!(
            plan.totals.water <= limits.total_water + 1e-6,
            "场景 {}: 用水超限",
            name
        );
        assert!(
            plan.totals.labor <= limits.total_labor_hours + 1e-6,
            "场景 {}: 用工超限",
            name
        );
        if let Some(fertilizer_limit) = limits.total_fertilizer {
            assert!(
                plan.totals.fertilizer <= fertilizer_limit + 1e-6,
                "场景 {}: 化肥超限",
                name
            );
        }
    }
}

#[test]
fn test_min_area_rows_are_honored() {
    // intermediate 场景所有作物带面积下限,最优解必须全部满足
    let problem = scenario::intermediate();
    let model = ModelBuilder::new().build(&problem).unwrap();
    let backend = solver_factory("microlp").unwrap();
    let outcome = backend.solve(&model, &SolveOptions::default()).unwrap();

    let plan = SolutionExtractor::new().extract(&problem, &model, &outcome);
    for crop in &problem.crops {
        let planted: f64 = plan
            .allocations
            .iter()
            .filter(|a| a.crop == crop.name)
            .map(|a| a.area)
            .sum();
        assert!(
            planted >= crop.min_area - 1e-6,
            "作物 {} 低于最小面积: {:.2} < {:.2}",
            crop.name,
            planted,
            crop.min_area
        );
        if let Some(max_area) = crop.max_area {
            assert!(
                planted <= max_area + 1e-6,
                "作物 {} 超过最大面积: {:.2} > {:.2}",
                crop.name,
                planted,
                max_area
            );
        }
    }
}

#[test]
fn test_parcel_allocation_never_exceeds_area() {
    let problem = scenario::advanced();
    let model = ModelBuilder::new().build(&problem).unwrap();
    let backend = solver_factory("microlp").unwrap();
    let outcome = backend.solve(&model, &SolveOptions::default()).unwrap();

    let plan = SolutionExtractor::new().extract(&problem, &model, &outcome);
    for summary in &plan.parcel_summaries {
        assert!(
            summary.used_area <= summary.total_area + 1e-6,
            "地块 {} 超分配",
            summary.parcel
        );
        assert!(summary.unused_area >= -1e-6);
    }
}

#[test]
fn test_invalid_problem_stops_before_model() {
    let mut problem = scenario::basic();
    // 重复作物名是校验错误,不应走到建模
    let duplicate = problem.crops[0].clone();
    problem.crops.push(duplicate);

    let report = ProblemValidator::new().validate(&problem);
    assert!(!report.is_valid());
    assert!(report.errors.iter().any(|e| e.contains("作物名称重复")));
}
