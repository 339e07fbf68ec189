// ==========================================
// 农业种植规划系统 - 规划模型构建引擎
// ==========================================
// 职责: PlanningProblem → 与后端无关的线性规划模型 (ModelSpec)
// 红线: 不做任何求解;系数装配必须确定性(作物外层、地块内层)
// ==========================================
// 决策变量: allocate_{作物}_{地块} ∈ [0, 地块面积]（土壤适配组合才建变量）
// MILP 模式: 额外引入 grow_{作物} ∈ {0,1} 选择变量
// 目标函数: maximize Σ 利润 × 质量系数 × 面积
// ==========================================

use crate::domain::error::DomainError;
use crate::domain::problem::PlanningProblem;
use thiserror::Error;

/// 模型构建错误类型
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("规划问题无法建模: {0}")]
    InvalidProblem(#[from] DomainError),

    #[error("没有可用的决策变量（无土壤适配的作物-地块组合）")]
    NoDecisionVariables,

    #[error("作物 {crop} 要求最小种植面积 {min_area} 公顷,但没有适配地块")]
    UnsatisfiableMinArea { crop: String, min_area: f64 },
}

/// Result 类型别名
pub type ModelResult<T> = Result<T, ModelError>;

// ==========================================
// 模型结构定义
// ==========================================

/// 约束比较方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    Le, // Σ terms ≤ rhs
    Ge, // Σ terms ≥ rhs
    Eq, // Σ terms = rhs
}

/// 决策变量定义
#[derive(Debug, Clone)]
pub struct VarSpec {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    pub integer: bool,
    pub objective_coefficient: f64,
}

/// 线性约束定义
///
/// terms 中的 usize 为变量在 ModelSpec::variables 中的下标
#[derive(Debug, Clone)]
pub struct ConstraintSpec {
    pub name: String,
    pub terms: Vec<(usize, f64)>,
    pub op: ConstraintOp,
    pub rhs: f64,
}

/// 面积分配变量 → (作物, 地块) 的回溯映射
#[derive(Debug, Clone, Copy)]
pub struct AllocationVar {
    pub var_index: usize,
    pub crop_index: usize,
    pub parcel_index: usize,
}

/// 作物选择变量 → 作物的回溯映射（仅 MILP 模式）
#[derive(Debug, Clone, Copy)]
pub struct SelectionVar {
    pub var_index: usize,
    pub crop_index: usize,
}

// ==========================================
// ModelSpec - 与后端无关的模型
// ==========================================
// 目标方向固定为最大化,由各后端自行转换
#[derive(Debug, Clone, Default)]
pub struct ModelSpec {
    pub variables: Vec<VarSpec>,
    pub constraints: Vec<ConstraintSpec>,
    pub allocations: Vec<AllocationVar>,
    pub selections: Vec<SelectionVar>,
}

impl ModelSpec {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// 模型是否含整数变量
    pub fn has_integer_variables(&self) -> bool {
        self.variables.iter().any(|v| v.integer)
    }

    /// 按名称查找变量（测试与诊断用）
    pub fn variable(&self, name: &str) -> Option<(usize, &VarSpec)> {
        self.variables
            .iter()
            .enumerate()
            .find(|(_, v)| v.name == name)
    }

    /// 按名称查找约束（测试与诊断用）
    pub fn constraint(&self, name: &str) -> Option<&ConstraintSpec> {
        self.constraints.iter().find(|c| c.name == name)
    }

    fn add_variable(&mut self, spec: VarSpec) -> usize {
        self.variables.push(spec);
        self.variables.len() - 1
    }

    fn add_constraint(&mut self, name: String, terms: Vec<(usize, f64)>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(ConstraintSpec {
            name,
            terms,
            op,
            rhs,
        });
    }
}

// ==========================================
// ModelBuilder - 模型构建引擎
// ==========================================
pub struct ModelBuilder;

impl ModelBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 构建规划模型
    ///
    /// # 参数
    /// - problem: 已通过领域校验的规划问题
    ///
    /// # 返回
    /// - Ok(ModelSpec): 可交给任意求解后端的模型
    /// - Err(ModelError): 问题数据无法构成有效模型
    pub fn build(&self, problem: &PlanningProblem) -> ModelResult<ModelSpec> {
        problem.validate()?;

        let mut model = ModelSpec::default();

        self.add_allocation_variables(problem, &mut model)?;
        if problem.integer_allocations {
            self.add_selection_variables(problem, &mut model);
        }

        self.add_land_constraints(problem, &mut model);
        self.add_resource_constraints(problem, &mut model);
        self.add_area_constraints(problem, &mut model)?;
        if problem.integer_allocations {
            self.add_diversity_constraints(problem, &mut model);
            self.add_exclusivity_constraints(problem, &mut model);
        }

        tracing::info!(
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            integer_mode = problem.integer_allocations,
            "规划模型构建完成"
        );
        Ok(model)
    }

    // ===== 决策变量: 面积分配 =====
    // 只为土壤适配的 (作物, 地块) 组合建变量
    fn add_allocation_variables(
        &self,
        problem: &PlanningProblem,
        model: &mut ModelSpec,
    ) -> ModelResult<()> {
        for (crop_index, crop) in problem.crops.iter().enumerate() {
            for (parcel_index, parcel) in problem.parcels.iter().enumerate() {
                if !crop.suits(parcel) {
                    continue;
                }

                let var_index = model.add_variable(VarSpec {
                    name: format!("allocate_{}_{}", crop.name, parcel.id),
                    lower: 0.0,
                    upper: parcel.area,
                    integer: false,
                    // 质量系数直接进入目标系数
                    objective_coefficient: crop.profit_per_hectare * parcel.quality_factor,
                });
                model.allocations.push(AllocationVar {
                    var_index,
                    crop_index,
                    parcel_index,
                });
            }
        }

        if model.allocations.is_empty() {
            return Err(ModelError::NoDecisionVariables);
        }
        Ok(())
    }

    // ===== 决策变量: 作物选择 (MILP) =====
    fn add_selection_variables(&self, problem: &PlanningProblem, model: &mut ModelSpec) {
        for (crop_index, crop) in problem.crops.iter().enumerate() {
            let has_allocation = model
                .allocations
                .iter()
                .any(|a| a.crop_index == crop_index);
            if !has_allocation {
                continue;
            }

            let var_index = model.add_variable(VarSpec {
                name: format!("grow_{}", crop.name),
                lower: 0.0,
                upper: 1.0,
                integer: true,
                objective_coefficient: 0.0,
            });
            model.selections.push(SelectionVar {
                var_index,
                crop_index,
            });
        }
    }

    // ===== 地块面积约束 =====
    fn add_land_constraints(&self, problem: &PlanningProblem, model: &mut ModelSpec) {
        for (parcel_index, parcel) in problem.parcels.iter().enumerate() {
            let terms: Vec<(usize, f64)> = model
                .allocations
                .iter()
                .filter(|a| a.parcel_index == parcel_index)
                .map(|a| (a.var_index, 1.0))
                .collect();
            if terms.is_empty() {
                continue;
            }
            model.add_constraint(
                format!("land_limit_{}", parcel.id),
                terms,
                ConstraintOp::Le,
                parcel.area,
            );

            // 地块自带水量上限（仅在配置时）
            if let Some(capacity) = parcel.water_capacity {
                let water_terms: Vec<(usize, f64)> = model
                    .allocations
                    .iter()
                    .filter(|a| a.parcel_index == parcel_index)
                    .map(|a| {
                        let crop = &problem.crops[a.crop_index];
                        (a.var_index, crop.water_requirement)
                    })
                    .collect();
                model.add_constraint(
                    format!("parcel_water_{}", parcel.id),
                    water_terms,
                    ConstraintOp::Le,
                    capacity,
                );
            }
        }
    }

    // ===== 全场资源约束 =====
    fn add_resource_constraints(&self, problem: &PlanningProblem, model: &mut ModelSpec) {
        let limits = &problem.limits;
        let allocations: Vec<AllocationVar> = model.allocations.clone();

        let gather = |coefficient: &dyn Fn(usize) -> f64| -> Vec<(usize, f64)> {
            allocations
                .iter()
                .map(|a| (a.var_index, coefficient(a.crop_index)))
                .collect()
        };

        // 水资源
        model.add_constraint(
            "total_water_limit".to_string(),
            gather(&|ci| problem.crops[ci].water_requirement),
            ConstraintOp::Le,
            limits.total_water,
        );

        // 人工工时
        model.add_constraint(
            "total_labor_limit".to_string(),
            gather(&|ci| problem.crops[ci].labor_hours),
            ConstraintOp::Le,
            limits.total_labor_hours,
        );

        // 预算: 单位面积成本 = 种植成本 + 工时成本 + 水费
        model.add_constraint(
            "total_budget_limit".to_string(),
            gather(&|ci| {
                let crop = &problem.crops[ci];
                crop.cost_per_hectare
                    + crop.labor_hours * limits.labor_cost_per_hour
                    + crop.water_requirement * limits.water_cost_per_m3
            }),
            ConstraintOp::Le,
            limits.total_budget,
        );

        // 化肥/农药（仅在设限时）
        if let Some(fertilizer_limit) = limits.total_fertilizer {
            model.add_constraint(
                "total_fertilizer_limit".to_string(),
                gather(&|ci| problem.crops[ci].fertilizer_need),
                ConstraintOp::Le,
                fertilizer_limit,
            );
        }
        if let Some(pesticide_limit) = limits.total_pesticide {
            model.add_constraint(
                "total_pesticide_limit".to_string(),
                gather(&|ci| problem.crops[ci].pesticide_need),
                ConstraintOp::Le,
                pesticide_limit,
            );
        }
    }

    // ===== 作物面积上下限约束 =====
    fn add_area_constraints(
        &self,
        problem: &PlanningProblem,
        model: &mut ModelSpec,
    ) -> ModelResult<()> {
        for (crop_index, crop) in problem.crops.iter().enumerate() {
            let terms: Vec<(usize, f64)> = model
                .allocations
                .iter()
                .filter(|a| a.crop_index == crop_index)
                .map(|a| (a.var_index, 1.0))
                .collect();

            if crop.min_area > 0.0 {
                if terms.is_empty() {
                    // 有下限要求却无适配地块,建模即不可行,提前给出可解释错误
                    return Err(ModelError::UnsatisfiableMinArea {
                        crop: crop.name.clone(),
                        min_area: crop.min_area,
                    });
                }

                if problem.integer_allocations {
                    // MILP: 下限只在作物被选中时生效（Σx ≥ min_area·y）
                    let selection = model
                        .selections
                        .iter()
                        .find(|s| s.crop_index == crop_index)
                        .copied();
                    if let Some(selection) = selection {
                        let mut linked = terms.clone();
                        linked.push((selection.var_index, -crop.min_area));
                        model.add_constraint(
                            format!("min_area_{}", crop.name),
                            linked,
                            ConstraintOp::Ge,
                            0.0,
                        );
                    }
                } else {
                    // 纯 LP: 绝对下限（与选择无关,历史口径）
                    model.add_constraint(
                        format!("min_area_{}", crop.name),
                        terms.clone(),
                        ConstraintOp::Ge,
                        crop.min_area,
                    );
                }
            }

            if let Some(max_area) = crop.max_area {
                if !terms.is_empty() {
                    model.add_constraint(
                        format!("max_area_{}", crop.name),
                        terms.clone(),
                        ConstraintOp::Le,
                        max_area,
                    );
                }
            }

            // MILP: 选择联动上界（未选中的作物不允许分配面积）
            if problem.integer_allocations && !terms.is_empty() {
                let selection = model
                    .selections
                    .iter()
                    .find(|s| s.crop_index == crop_index)
                    .copied();
                if let Some(selection) = selection {
                    let big_m: f64 = problem
                        .parcels
                        .iter()
                        .filter(|p| crop.suits(p))
                        .map(|p| p.area)
                        .sum();
                    let mut linked = terms;
                    linked.push((selection.var_index, -big_m));
                    model.add_constraint(
                        format!("select_link_{}", crop.name),
                        linked,
                        ConstraintOp::Le,
                        0.0,
                    );
                }
            }
        }
        Ok(())
    }

    // ===== 多样性约束 (MILP) =====
    fn add_diversity_constraints(&self, problem: &PlanningProblem, model: &mut ModelSpec) {
        if model.selections.is_empty() {
            return;
        }
        let terms: Vec<(usize, f64)> = model
            .selections
            .iter()
            .map(|s| (s.var_index, 1.0))
            .collect();

        if problem.limits.min_crop_diversity > 0 {
            model.add_constraint(
                "min_diversity".to_string(),
                terms.clone(),
                ConstraintOp::Ge,
                problem.limits.min_crop_diversity as f64,
            );
        }
        if let Some(max_diversity) = problem.limits.max_crop_diversity {
            model.add_constraint(
                "max_diversity".to_string(),
                terms,
                ConstraintOp::Le,
                max_diversity as f64,
            );
        }
    }

    // ===== 互斥约束 (MILP) =====
    fn add_exclusivity_constraints(&self, problem: &PlanningProblem, model: &mut ModelSpec) {
        for (a, b) in &problem.compatibility.incompatible_pairs {
            let find = |name: &str| {
                problem
                    .crops
                    .iter()
                    .position(|c| c.name == name)
                    .and_then(|ci| model.selections.iter().find(|s| s.crop_index == ci))
                    .map(|s| s.var_index)
            };
            if let (Some(va), Some(vb)) = (find(a), find(b)) {
                model.add_constraint(
                    format!("exclusive_{}_{}", a, b),
                    vec![(va, 1.0), (vb, 1.0)],
                    ConstraintOp::Le,
                    1.0,
                );
            }
        }
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
