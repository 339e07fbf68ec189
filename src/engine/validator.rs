// ==========================================
// 农业种植规划系统 - 问题校验引擎
// ==========================================
// 职责: 求解前检查规划问题,输出错误与警告清单
// 红线: 只读校验,不修改问题数据;所有结论必须附带原因
// ==========================================

use crate::domain::problem::PlanningProblem;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 月度分布与总量允许的偏差
const DISTRIBUTION_TOLERANCE: f64 = 0.01;

// ==========================================
// ValidationReport - 校验报告
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,   // 阻断求解的错误
    pub warnings: Vec<String>, // 不阻断求解的警告
}

impl ValidationReport {
    /// 是否可以进入建模阶段
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

// ==========================================
// ProblemValidator - 问题校验引擎
// ==========================================
pub struct ProblemValidator;

impl ProblemValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验规划问题
    ///
    /// # 返回
    /// - ValidationReport: errors 非空时不应继续建模
    pub fn validate(&self, problem: &PlanningProblem) -> ValidationReport {
        let mut report = ValidationReport::default();

        self.check_crops(problem, &mut report);
        self.check_parcels(problem, &mut report);
        self.check_limits(problem, &mut report);
        self.check_compatibility(problem, &mut report);
        self.check_feasibility(problem, &mut report);
        self.check_objectives(problem, &mut report);

        tracing::debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "问题校验完成"
        );
        report
    }

    // ===== 作物检查 =====
    fn check_crops(&self, problem: &PlanningProblem, report: &mut ValidationReport) {
        let mut seen = HashSet::new();
        for crop in &problem.crops {
            if !seen.insert(crop.name.as_str()) {
                report.error(format!("作物名称重复: {}", crop.name));
            }

            if let Err(e) = crop.validate() {
                report.error(e.to_string());
            }

            if crop.profit_per_hectare == 0.0 {
                report.warn(format!("作物 {}: 利润为零,求解时不会被选择", crop.name));
            }
            if crop.growth_duration_days == 0 {
                report.error(format!("作物 {}: 生长周期必须为正", crop.name));
            } else if crop.growth_duration_days > 365 {
                report.warn(format!(
                    "作物 {}: 生长周期超过 365 天（{} 天）",
                    crop.name, crop.growth_duration_days
                ));
            }
            if crop.preferred_soil_types.is_empty() {
                report.warn(format!("作物 {}: 未配置适配土壤类型,无法种植", crop.name));
            }
        }
    }

    // ===== 地块检查 =====
    fn check_parcels(&self, problem: &PlanningProblem, report: &mut ValidationReport) {
        let mut seen = HashSet::new();
        for parcel in &problem.parcels {
            if !seen.insert(parcel.id.as_str()) {
                report.error(format!("地块编号重复: {}", parcel.id));
            }

            if let Err(e) = parcel.validate() {
                report.error(e.to_string());
            }

            if parcel.slope_percentage > 30.0 {
                report.warn(format!(
                    "地块 {}: 坡度超过 30%（{}%）,存在侵蚀风险",
                    parcel.id, parcel.slope_percentage
                ));
            }
        }
    }

    // ===== 资源约束检查 =====
    fn check_limits(&self, problem: &PlanningProblem, report: &mut ValidationReport) {
        let limits = &problem.limits;

        if let Err(e) = limits.validate() {
            report.error(e.to_string());
        }

        if limits.total_budget == 0.0 {
            report.warn("总预算为零,任何有成本的种植都不可行".to_string());
        }
        if limits.total_water == 0.0 {
            report.warn("总可用水量为零".to_string());
        }
        if limits.total_labor_hours == 0.0 {
            report.warn("总人工工时为零".to_string());
        }

        if limits.min_crop_diversity > problem.crops.len() {
            report.error(format!(
                "最少作物种数 ({}) 超过候选作物数量 ({})",
                limits.min_crop_diversity,
                problem.crops.len()
            ));
        }

        // 月度分布核对（仅在配置了分布时）
        if !limits.monthly_water_distribution.is_empty() {
            let sum: f64 = limits.monthly_water_distribution.values().sum();
            if (sum - limits.total_water).abs() > DISTRIBUTION_TOLERANCE {
                report.warn(format!(
                    "月度水量分布合计 ({:.2}) 与总可用水量 ({:.2}) 不一致",
                    sum, limits.total_water
                ));
            }
        }
        if !limits.monthly_labor_distribution.is_empty() {
            let sum: f64 = limits.monthly_labor_distribution.values().sum();
            if (sum - limits.total_labor_hours).abs() > DISTRIBUTION_TOLERANCE {
                report.warn(format!(
                    "月度工时分布合计 ({:.2}) 与总人工工时 ({:.2}) 不一致",
                    sum, limits.total_labor_hours
                ));
            }
        }
    }

    // ===== 相容性规则检查 =====
    fn check_compatibility(&self, problem: &PlanningProblem, report: &mut ValidationReport) {
        let known: HashSet<&str> = problem.crops.iter().map(|c| c.name.as_str()).collect();

        for (a, b) in &problem.compatibility.incompatible_pairs {
            for name in [a, b] {
                if !known.contains(name.as_str()) {
                    report.warn(format!("互斥规则引用未知作物: {}", name));
                }
            }
        }
        for (a, b) in &problem.compatibility.beneficial_pairs {
            for name in [a, b] {
                if !known.contains(name.as_str()) {
                    report.warn(format!("协同规则引用未知作物: {}", name));
                }
            }
        }

        if problem.enable_rotation {
            let any_group = problem.crops.iter().any(|c| c.rotation_group != 0);
            if !any_group {
                report.warn("已启用轮作,但所有作物的轮作组均为 0".to_string());
            }
        }
    }

    // ===== 整体可行性检查 =====
    fn check_feasibility(&self, problem: &PlanningProblem, report: &mut ValidationReport) {
        let total_area = problem.total_area();
        let min_area_sum: f64 = problem.crops.iter().map(|c| c.min_area).sum();
        if min_area_sum > total_area {
            report.error(format!(
                "作物最小种植面积合计 ({:.2} 公顷) 超过地块总面积 ({:.2} 公顷)",
                min_area_sum, total_area
            ));
        }

        // 有适配地块的作物数量
        let plantable = problem
            .crops
            .iter()
            .filter(|crop| problem.parcels.iter().any(|parcel| crop.suits(parcel)))
            .count();

        if plantable == 0 {
            report.error("不存在土壤类型匹配的作物-地块组合".to_string());
        } else if problem.limits.min_crop_diversity > plantable {
            report.error(format!(
                "最少作物种数 ({}) 超过有适配地块的作物数量 ({})",
                problem.limits.min_crop_diversity, plantable
            ));
        }
    }

    // ===== 目标权重检查 =====
    fn check_objectives(&self, problem: &PlanningProblem, report: &mut ValidationReport) {
        if let Err(e) = problem.objectives.validate() {
            report.error(e.to_string());
        }
        if problem.objectives.all_zero() {
            report.error("所有目标权重均为零,目标函数退化".to_string());
        }
    }
}

impl Default for ProblemValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crop::Crop;
    use crate::domain::parcel::LandParcel;
    use crate::domain::resources::{CropCompatibility, ObjectiveWeights, ResourceLimits};
    use crate::domain::types::{Season, SoilType};
    use std::collections::BTreeMap;

    fn crop(name: &str, soil: SoilType) -> Crop {
        Crop {
            name: name.to_string(),
            profit_per_hectare: 2500.0,
            cost_per_hectare: 800.0,
            water_requirement: 300.0,
            labor_hours: 25.0,
            growth_duration_days: 120,
            preferred_soil_types: vec![soil],
            planting_season: Season::Spring,
            min_area: 0.0,
            max_area: None,
            rotation_group: 0,
            fertilizer_need: 0.0,
            pesticide_need: 0.0,
        }
    }

    fn base_problem() -> PlanningProblem {
        PlanningProblem {
            crops: vec![crop("Wheat", SoilType::Loamy), crop("Corn", SoilType::Sandy)],
            parcels: vec![
                LandParcel::new("P1", 50.0, SoilType::Loamy),
                LandParcel::new("P2", 30.0, SoilType::Sandy),
            ],
            limits: ResourceLimits {
                total_budget: 150_000.0,
                total_water: 30_000.0,
                total_labor_hours: 3_000.0,
                total_fertilizer: None,
                total_pesticide: None,
                min_crop_diversity: 1,
                max_crop_diversity: None,
                labor_cost_per_hour: 15.0,
                water_cost_per_m3: 0.5,
                monthly_water_distribution: BTreeMap::new(),
                monthly_labor_distribution: BTreeMap::new(),
            },
            compatibility: CropCompatibility::default(),
            objectives: ObjectiveWeights::default(),
            planning_horizon_months: 12,
            enable_rotation: false,
            integer_allocations: false,
        }
    }

    #[test]
    fn test_clean_problem_is_valid() {
        let report = ProblemValidator::new().validate(&base_problem());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    }

    #[test]
    fn test_duplicate_crop_name_is_error() {
        let mut problem = base_problem();
        problem.crops.push(crop("Wheat", SoilType::Clay));

        let report = ProblemValidator::new().validate(&problem);
        assert!(!report.is_valid());
        assert!(report.errors.iter().any(|e| e.contains("作物名称重复")));
    }

    #[test]
    fn test_zero_profit_is_warning_only() {
        let mut problem = base_problem();
        problem.crops[0].profit_per_hectare = 0.0;

        let report = ProblemValidator::new().validate(&problem);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.contains("利润为零")));
    }

    #[test]
    fn test_min_area_sum_exceeding_land_is_error() {
        let mut problem = base_problem();
        problem.crops[0].min_area = 60.0;
        problem.crops[1].min_area = 40.0;

        let report = ProblemValidator::new().validate(&problem);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("最小种植面积合计")));
    }

    #[test]
    fn test_diversity_above_plantable_count_is_error() {
        let mut problem = base_problem();
        // Corn 无适配地块 → 可种作物只剩 1 种
        problem.parcels.retain(|p| p.soil_type == SoilType::Loamy);
        problem.limits.min_crop_diversity = 2;

        let report = ProblemValidator::new().validate(&problem);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("有适配地块的作物数量")));
    }

    #[test]
    fn test_monthly_distribution_mismatch_is_warning() {
        let mut problem = base_problem();
        problem
            .limits
            .monthly_water_distribution
            .insert(4, 10_000.0);
        problem
            .limits
            .monthly_water_distribution
            .insert(5, 10_000.0);
        // 合计 20000 != 30000

        let report = ProblemValidator::new().validate(&problem);
        assert!(report.is_valid());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("月度水量分布合计")));
    }

    #[test]
    fn test_unknown_crop_in_compatibility_is_warning() {
        let mut problem = base_problem();
        problem
            .compatibility
            .incompatible_pairs
            .push(("Wheat".to_string(), "Rice".to_string()));

        let report = ProblemValidator::new().validate(&problem);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.contains("Rice")));
    }

    #[test]
    fn test_all_zero_weights_is_error() {
        let mut problem = base_problem();
        problem.objectives = ObjectiveWeights {
            profit_weight: 0.0,
            sustainability_weight: 0.0,
            diversity_weight: 0.0,
            water_efficiency_weight: 0.0,
        };

        let report = ProblemValidator::new().validate(&problem);
        assert!(report.errors.iter().any(|e| e.contains("目标权重")));
    }

    #[test]
    fn test_rotation_enabled_without_groups_is_warning() {
        let mut problem = base_problem();
        problem.enable_rotation = true;

        let report = ProblemValidator::new().validate(&problem);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.contains("轮作")));
    }
}
